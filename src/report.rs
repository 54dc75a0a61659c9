use std::fmt::Write;

use crate::chart;
use crate::loader::{DataSource, Loader};
use crate::state::{AppState, LoadTrigger};
use crate::table::TableView;
use crate::timestamp::DisplayZone;

/// Top-level composition: owns the state, hands the trigger write access and
/// the views read access.
pub struct Dashboard {
    state: AppState,
    loader: Loader,
    zone: DisplayZone,
}

impl Dashboard {
    pub fn new(loader: Loader, zone: DisplayZone) -> Self {
        Self {
            state: AppState::default(),
            loader,
            zone,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn trigger(&mut self, source: &DataSource) -> bool {
        LoadTrigger::new(&mut self.state, &self.loader)
            .activate(source, self.zone)
            .await
    }

    pub fn render(&self, table: &TableView) -> String {
        build_report(&self.state, table)
    }
}

pub fn render_error(state: &AppState) -> Option<String> {
    state.error().map(|message| format!("Error: {message}"))
}

pub fn build_report(state: &AppState, table: &TableView) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Performance Dashboard");
    if let Some(error) = render_error(state) {
        let _ = writeln!(output);
        let _ = writeln!(output, "{error}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Records");
    let _ = writeln!(output, "{}", table.render(state.data()));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Counts");
    let _ = writeln!(output, "{}", chart::render_text(state.data()));

    output
}
