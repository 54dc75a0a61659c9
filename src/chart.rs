use std::collections::HashMap;
use std::fmt::Write;

use plotly::configuration::DisplayModeBar;
use plotly::layout::Margin;
use plotly::{Bar, Configuration, Layout, Plot};

use crate::models::AugmentedRecord;
use crate::table::NO_DATA;

const CHART_WIDTH: usize = 700;
const CHART_HEIGHT: usize = 450;
const CHART_MARGIN: usize = 50;
const TEXT_BAR_WIDTH: usize = 40;

/// Counts records per status, in the order each status first appears.
pub fn status_counts(records: &[AugmentedRecord]) -> Vec<(String, usize)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for record in records {
        match positions.get(record.status.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(record.status.as_str(), counts.len());
                counts.push((record.status.clone(), 1));
            }
        }
    }

    counts
}

pub fn build_plot(records: &[AugmentedRecord]) -> Plot {
    let (statuses, counts): (Vec<String>, Vec<usize>) = status_counts(records).into_iter().unzip();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(statuses, counts));
    plot.set_layout(
        Layout::new()
            .width(CHART_WIDTH)
            .height(CHART_HEIGHT)
            .margin(
                Margin::new()
                    .top(CHART_MARGIN)
                    .bottom(CHART_MARGIN)
                    .left(CHART_MARGIN)
                    .right(CHART_MARGIN),
            ),
    );
    plot.set_configuration(
        Configuration::new()
            .display_mode_bar(DisplayModeBar::False)
            .responsive(true),
    );
    plot
}

/// Standalone HTML page with the status bar chart, or the placeholder.
pub fn render_html(data: Option<&[AugmentedRecord]>) -> String {
    let body = match data {
        Some(records) => build_plot(records).to_inline_html(Some("status-chart")),
        None => format!("<div>{NO_DATA}</div>"),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Status counts</title>
<script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

pub fn render_text(data: Option<&[AugmentedRecord]>) -> String {
    let Some(records) = data else {
        return NO_DATA.to_string();
    };

    let counts = status_counts(records);
    if counts.is_empty() {
        return "(no statuses)".to_string();
    }

    let label_width = counts.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0);
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);

    let mut output = String::new();
    for (status, count) in &counts {
        let len = (count * TEXT_BAR_WIDTH).div_ceil(max_count);
        let _ = writeln!(
            output,
            "{status:<label_width$} | {} {count}",
            "█".repeat(len)
        );
    }
    output.truncate(output.trim_end().len());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    fn with_statuses(statuses: &[&str]) -> Vec<AugmentedRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| AugmentedRecord {
                id: i.to_string(),
                timestamp: "2024-01-15T00:00:00Z".to_string(),
                value: Value::Numeric(1.0),
                parameter_set: "ab".to_string(),
                status: status.to_string(),
                performance_index: 0.0,
            })
            .collect()
    }

    #[test]
    fn counts_follow_first_seen_order() {
        let records = with_statuses(&["completed", "failed", "completed"]);
        assert_eq!(
            status_counts(&records),
            vec![("completed".to_string(), 2), ("failed".to_string(), 1)]
        );
    }

    #[test]
    fn order_is_not_sorted() {
        let records = with_statuses(&["running", "pending", "completed", "running", "failed"]);
        let order: Vec<String> = status_counts(&records).into_iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["running", "pending", "completed", "failed"]);
    }

    #[test]
    fn no_data_renders_placeholder() {
        assert_eq!(render_text(None), NO_DATA);
        assert!(render_html(None).contains("<div>No data available</div>"));
    }

    #[test]
    fn html_chart_carries_bar_trace_and_hides_mode_bar() {
        let records = with_statuses(&["completed", "failed", "completed"]);
        let html = render_html(Some(records.as_slice()));
        assert!(html.contains("\"type\": \"bar\""));
        assert!(html.contains("\"completed\""));
        assert!(html.contains("\"displayModeBar\": false"));
        assert!(html.contains("status-chart"));
    }

    #[test]
    fn text_bars_scale_to_the_largest_count() {
        let records = with_statuses(&["completed", "failed", "completed"]);
        let text = render_text(Some(records.as_slice()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("completed |"));
        assert!(lines[0].ends_with(" 2"));
        assert_eq!(lines[0].matches('█').count(), TEXT_BAR_WIDTH);
        assert_eq!(lines[1].matches('█').count(), TEXT_BAR_WIDTH / 2);
    }
}
