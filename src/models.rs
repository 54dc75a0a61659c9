use serde::{Deserialize, Serialize, Serializer};

/// A record exactly as it appears in the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub timestamp: String,
    #[serde(default)]
    pub value: Option<RawValue>,
    pub parameter_set: String,
    pub status: String,
}

/// The JSON shapes a raw `value` may take besides `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Numeric(f64),
    NotApplicable,
}

pub const NOT_APPLICABLE: &str = "N/A";

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::NotApplicable => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{v}"),
            Value::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Numeric(v) => serializer.serialize_f64(*v),
            Value::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// A record after normalisation, carrying its derived performance index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedRecord {
    pub id: String,
    pub timestamp: String,
    pub value: Value,
    pub parameter_set: String,
    pub status: String,
    pub performance_index: f64,
}

/// Reverts an augmented record; the sentinel becomes `null` again.
impl From<&AugmentedRecord> for RawRecord {
    fn from(record: &AugmentedRecord) -> Self {
        RawRecord {
            id: record.id.clone(),
            timestamp: record.timestamp.clone(),
            value: record.value.as_f64().map(RawValue::Number),
            parameter_set: record.parameter_set.clone(),
            status: record.status.clone(),
        }
    }
}
