use std::path::Path;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use rand::Rng;
use tracing::warn;

use crate::models::{RawRecord, RawValue};

pub const PARAMETER_SETS: [&str; 5] = ["Alpha", "Beta", "Gamma", "Set", "Delta"];
pub const STATUSES: [&str; 4] = ["completed", "running", "failed", "pending"];
pub const CEIL_VALUE: f64 = 300.0;
const STEP_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub num_data_points: usize,
    pub dropout_rate: f64,
    pub start: NaiveDateTime,
}

/// Parses the base timestamp, falling back to now when it is absent or unreadable.
pub fn parse_start(raw: Option<&str>) -> NaiveDateTime {
    let Some(raw) = raw else {
        return Local::now().naive_local();
    };
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(start) = NaiveDateTime::parse_from_str(raw, fmt) {
            return start;
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(start) = date.and_hms_opt(0, 0, 0) {
            return start;
        }
    }
    warn!(start = raw, "start is not an ISO date-time, using the current time");
    Local::now().naive_local()
}

fn record_id(index: usize, num_data_points: usize) -> String {
    let magnitude = num_data_points.to_string().len() - 1;
    if magnitude == 0 {
        format!("sim_{index}")
    } else {
        format!("sim_{index:0width$}", width = magnitude + 1)
    }
}

pub fn generate_records<R: Rng>(
    options: &GenerateOptions,
    rng: &mut R,
) -> anyhow::Result<Vec<RawRecord>> {
    if options.num_data_points == 0 {
        anyhow::bail!("the number of data points is zero, nothing to generate");
    }
    if !(0.0..=1.0).contains(&options.dropout_rate) {
        anyhow::bail!(
            "the dropout rate must be between 0 and 1, got {}",
            options.dropout_rate
        );
    }
    if options.num_data_points >= 10_000 {
        warn!(
            num_data_points = options.num_data_points,
            "large dataset requested, consider a smaller one"
        );
    }

    let records = (1..=options.num_data_points)
        .map(|index| {
            let timestamp = options.start + Duration::minutes(STEP_MINUTES * index as i64);
            let value = if rng.gen::<f64>() < options.dropout_rate {
                None
            } else {
                Some(RawValue::Number(rng.gen_range(0.0..CEIL_VALUE)))
            };
            RawRecord {
                id: record_id(index, options.num_data_points),
                timestamp: iso_timestamp(&timestamp),
                value,
                parameter_set: PARAMETER_SETS[rng.gen_range(0..PARAMETER_SETS.len())].to_string(),
                status: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
            }
        })
        .collect();

    Ok(records)
}

// Microsecond precision; the fraction is left out when it is zero.
fn iso_timestamp(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() / 1_000 == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

pub fn write_dataset(path: &Path, records: &[RawRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
