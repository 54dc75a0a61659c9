use std::collections::HashSet;
use std::fmt::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::models::AugmentedRecord;
use crate::timestamp::DisplayZone;

pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const NO_DATA: &str = "No data available";

const HEADERS: [&str; 7] = [
    "",
    "ID",
    "Timestamp",
    "Value",
    "Parameter Set",
    "Status",
    "Performance Index",
];

pub fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a page size"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

/// Rounds to two decimals for presentation; stored values are never touched.
///
/// Works on the exact decimal expansion of `value`. Exact ties round away
/// from zero, and a negative that rounds to zero shows as plain `0`.
pub fn round_for_display(value: f64) -> f64 {
    let magnitude = value.abs();
    let scaled = magnitude * 100.0;
    let exact_tie = scaled.fract() == 0.5 && magnitude.mul_add(100.0, -scaled) == 0.0;
    let rounded = if exact_tie {
        scaled.ceil() / 100.0
    } else {
        format!("{magnitude:.2}").parse().unwrap_or(magnitude)
    };
    rounded.copysign(value) + 0.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub selected: bool,
    pub id: String,
    pub timestamp: String,
    pub value: String,
    pub parameter_set: String,
    pub status: String,
    pub performance_index: f64,
}

#[derive(Debug, Clone)]
pub struct TableView {
    zone: DisplayZone,
    page_size: usize,
    page: usize,
    selected: HashSet<String>,
}

impl TableView {
    pub fn new(zone: DisplayZone) -> Self {
        Self {
            zone,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
            selected: HashSet::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> anyhow::Result<Self> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            anyhow::bail!("page size must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}");
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// 1-based; out-of-range pages clamp when rendering.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn select<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn rows(&self, data: &[AugmentedRecord]) -> Vec<TableRow> {
        data.iter()
            .map(|record| TableRow {
                selected: self.selected.contains(&record.id),
                id: record.id.clone(),
                timestamp: self.zone.format_locale(&record.timestamp),
                value: record.value.to_string(),
                parameter_set: record.parameter_set.clone(),
                status: record.status.clone(),
                performance_index: round_for_display(record.performance_index),
            })
            .collect()
    }

    /// Rows on the current page, after clamping.
    pub fn page_rows(&self, data: &[AugmentedRecord]) -> Vec<TableRow> {
        let page = self.page.min(self.page_count(data.len()));
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(data.len());
        self.rows(&data[start.min(end)..end])
    }

    pub fn render(&self, data: Option<&[AugmentedRecord]>) -> String {
        let Some(data) = data else {
            return NO_DATA.to_string();
        };

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(HEADERS.to_vec());

        for row in self.page_rows(data) {
            table.add_row(vec![
                if row.selected { "[x]" } else { "[ ]" }.to_string(),
                row.id,
                row.timestamp,
                row.value,
                row.parameter_set,
                row.status,
                row.performance_index.to_string(),
            ]);
        }

        let total = data.len();
        let pages = self.page_count(total);
        let page = self.page.min(pages);
        let first = if total == 0 { 0 } else { (page - 1) * self.page_size + 1 };
        let last = (page * self.page_size).min(total);
        let selected = data
            .iter()
            .filter(|record| self.selected.contains(&record.id))
            .count();

        let mut output = table.to_string();
        let _ = write!(
            output,
            "\nrows {first}-{last} of {total} | page {page}/{pages} | {selected} selected"
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    fn record(id: usize, performance_index: f64) -> AugmentedRecord {
        AugmentedRecord {
            id: format!("sim_{id:03}"),
            timestamp: "2024-01-15T00:00:00Z".to_string(),
            value: Value::Numeric(50.0),
            parameter_set: "ab".to_string(),
            status: "completed".to_string(),
            performance_index,
        }
    }

    fn records(n: usize) -> Vec<AugmentedRecord> {
        (1..=n).map(|i| record(i, i as f64)).collect()
    }

    #[test]
    fn no_data_renders_placeholder() {
        let view = TableView::new(DisplayZone::Utc);
        assert_eq!(view.render(None), NO_DATA);
    }

    #[test]
    fn empty_dataset_still_renders_a_grid() {
        let view = TableView::new(DisplayZone::Utc);
        let empty: Vec<AugmentedRecord> = Vec::new();
        let output = view.render(Some(empty.as_slice()));
        assert!(output.contains("Performance Index"));
        assert!(output.contains("rows 0-0 of 0 | page 1/1"));
    }

    #[test]
    fn default_page_shows_ten_rows() {
        let data = records(23);
        let view = TableView::new(DisplayZone::Utc);
        let rows = view.page_rows(&data);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].id, "sim_001");
        assert!(view.render(Some(data.as_slice())).contains("rows 1-10 of 23 | page 1/3"));
    }

    #[test]
    fn last_page_is_partial_and_overflow_clamps() {
        let data = records(23);
        let view = TableView::new(DisplayZone::Utc).with_page(9);
        let rows = view.page_rows(&data);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].id, "sim_023");
        assert!(view.render(Some(data.as_slice())).contains("rows 21-23 of 23 | page 3/3"));
    }

    #[test]
    fn page_size_must_be_an_offered_option() {
        assert!(TableView::new(DisplayZone::Utc).with_page_size(20).is_ok());
        assert!(TableView::new(DisplayZone::Utc).with_page_size(7).is_err());
        assert_eq!(parse_page_size("50"), Ok(50));
        assert!(parse_page_size("3").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn performance_index_is_rounded_only_for_display() {
        let data = vec![record(1, (50.0 / 30.0) * 100.0)];
        let view = TableView::new(DisplayZone::Utc);
        let rows = view.rows(&data);
        assert_eq!(rows[0].performance_index, 166.67);
        assert!(view.render(Some(data.as_slice())).contains("166.67"));
        assert_eq!(data[0].performance_index, (50.0 / 30.0) * 100.0);
    }

    #[test]
    fn display_rounding_follows_the_decimal_expansion() {
        assert_eq!(round_for_display(0.125), 0.13);
        assert_eq!(round_for_display(-0.125), -0.13);
        assert_eq!(round_for_display(2.675), 2.67);
        assert_eq!(round_for_display(1.005), 1.0);
        assert_eq!(round_for_display(12.345_01), 12.35);
        assert_eq!(round_for_display(-0.001).to_string(), "0");
        assert!(round_for_display(f64::NAN).is_nan());
    }

    #[test]
    fn cells_are_formatted_for_reading() {
        let mut data = vec![record(1, 5.0)];
        data[0].value = Value::NotApplicable;
        let rows = TableView::new(DisplayZone::Utc).rows(&data);
        assert_eq!(rows[0].timestamp, "1/15/2024, 12:00:00 AM");
        assert_eq!(rows[0].value, "N/A");
    }

    #[test]
    fn selection_marks_rows_and_counts_them() {
        let data = records(12);
        let view = TableView::new(DisplayZone::Utc).select(["sim_002", "sim_011", "nope"]);
        let rows = view.page_rows(&data);
        assert!(rows[1].selected);
        assert!(!rows[0].selected);
        assert!(view.render(Some(data.as_slice())).contains("| 2 selected"));
    }
}
