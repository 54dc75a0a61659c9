use tracing::{info, warn};

use crate::augment::{self, AugmentError};
use crate::loader::{DataSource, Loader};
use crate::models::AugmentedRecord;
use crate::timestamp::DisplayZone;

/// The single slot the views read from. `data == None` is the no-data marker.
#[derive(Debug, Default)]
pub struct AppState {
    data: Option<Vec<AugmentedRecord>>,
    error: Option<String>,
    loads: u64,
}

impl AppState {
    pub fn data(&self) -> Option<&[AugmentedRecord]> {
        self.data.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn publish(&mut self, result: Result<Vec<AugmentedRecord>, AugmentError>) {
        self.loads += 1;
        match result {
            Ok(records) => {
                info!(records = records.len(), load = self.loads, "state replaced");
                self.data = Some(records);
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, load = self.loads, "load failed, keeping previous data");
                self.error = Some(err.to_string());
            }
        }
    }
}

/// Write capability over [`AppState`]: the only thing allowed to change it.
pub struct LoadTrigger<'a> {
    state: &'a mut AppState,
    loader: &'a Loader,
}

impl<'a> LoadTrigger<'a> {
    pub fn new(state: &'a mut AppState, loader: &'a Loader) -> Self {
        Self { state, loader }
    }

    /// Runs load + augment and publishes the outcome. Returns whether it succeeded.
    pub async fn activate(&mut self, source: &DataSource, zone: DisplayZone) -> bool {
        let result = augment::augment_performance_index(self.loader, source, zone).await;
        let ok = result.is_ok();
        self.state.publish(result);
        ok
    }
}
