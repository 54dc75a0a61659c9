use thiserror::Error;
use tracing::{debug, info};

use crate::loader::{DataSource, LoadError, Loader};
use crate::models::{AugmentedRecord, RawRecord, RawValue, Value};
use crate::timestamp::DisplayZone;

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("No data available.")]
    NoData,
}

/// Loads the dataset and augments every record, or nothing at all.
pub async fn augment_performance_index(
    loader: &Loader,
    source: &DataSource,
    zone: DisplayZone,
) -> Result<Vec<AugmentedRecord>, AugmentError> {
    let raw = loader.load(source).await?.ok_or(AugmentError::NoData)?;
    let augmented = augment_records(raw, zone);
    info!(records = augmented.len(), "dataset augmented");
    Ok(augmented)
}

pub fn augment_records(records: Vec<RawRecord>, zone: DisplayZone) -> Vec<AugmentedRecord> {
    records
        .into_iter()
        .map(|record| augment_record(record, zone))
        .collect()
}

pub fn augment_record(raw: RawRecord, zone: DisplayZone) -> AugmentedRecord {
    let (value, performance_index) = match raw.value {
        None | Some(RawValue::Text(_)) => (Value::NotApplicable, 0.0),
        Some(RawValue::Number(v)) => {
            let index = index_for(
                v,
                &raw.status,
                zone.day_of_month(&raw.timestamp),
                parameter_len(&raw.parameter_set),
            );
            (Value::Numeric(v), index)
        }
    };

    debug!(id = %raw.id, performance_index, "record augmented");
    AugmentedRecord {
        id: raw.id,
        timestamp: raw.timestamp,
        value,
        parameter_set: raw.parameter_set,
        status: raw.status,
        performance_index,
    }
}

/// The status rule for a numeric value. `day` and `param_len` only matter
/// for completed records; an unreadable day (`None`) scores as NaN.
pub fn index_for(value: f64, status: &str, day: Option<u32>, param_len: usize) -> f64 {
    if status == "completed" && day != Some(0) && param_len != 0 {
        let day = day.map_or(f64::NAN, f64::from);
        (value / (day * param_len as f64)) * 100.0
    } else if status == "running" || status == "pending" {
        value / 2.0
    } else {
        0.0
    }
}

// Length in UTF-16 code units, the way the dataset's producers count it.
fn parameter_len(parameter_set: &str) -> usize {
    parameter_set.encode_utf16().count()
}
