use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value as JsonValue};

/// Top-level fields of a stored document.
pub type Fields = BTreeMap<String, FieldValue>;

/// Store-native timestamp: seconds since the Unix epoch plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreTimestamp {
    seconds: i64,
    nanos: u32,
}

impl StoreTimestamp {
    /// Build from raw parts. `None` if the parts do not name a representable instant.
    pub fn new(seconds: i64, nanos: u32) -> Option<Self> {
        if nanos >= 1_000_000_000 {
            return None;
        }
        DateTime::from_timestamp(seconds, nanos).map(|_| Self { seconds, nanos })
    }

    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self {
            seconds: instant.timestamp(),
            // chrono encodes a leap second as nanos >= 1e9; fold it into the last nanosecond.
            nanos: instant.timestamp_subsec_nanos().min(999_999_999),
        }
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds, self.nanos).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }
}

impl From<DateTime<Utc>> for StoreTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

/// A single field value as the document store holds it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(StoreTimestamp),
    Array(Vec<FieldValue>),
    Map(Fields),
}

impl FieldValue {
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => FieldValue::String(s),
            JsonValue::Array(items) => FieldValue::Array(items.into_iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON view of the value. Timestamps become RFC 3339 strings in UTC
    /// with as many fractional digits as needed.
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Null => JsonValue::Null,
            FieldValue::Bool(b) => JsonValue::Bool(*b),
            FieldValue::Integer(i) => JsonValue::Number((*i).into()),
            FieldValue::Double(d) => Number::from_f64(*d).map(JsonValue::Number).unwrap_or(JsonValue::Null),
            FieldValue::String(s) => JsonValue::String(s.clone()),
            FieldValue::Timestamp(ts) => {
                JsonValue::String(ts.to_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            FieldValue::Map(fields) => JsonValue::Object(fields_to_json(fields)),
        }
    }

    /// Order two values of comparable types; `None` across unrelated types.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Double(a), FieldValue::Double(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Double(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Double(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(StoreTimestamp::from_datetime(value))
    }
}

pub fn fields_to_json(fields: &Fields) -> Map<String, JsonValue> {
    fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

/// Resolve a dotted path (`filters.dateRange.start`) inside a document.
pub fn lookup<'a>(fields: &'a Fields, path: &str) -> Option<&'a FieldValue> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        match current {
            FieldValue::Map(inner) => current = inner.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Mutable counterpart of [`lookup`].
pub fn lookup_mut<'a>(fields: &'a mut Fields, path: &str) -> Option<&'a mut FieldValue> {
    let mut segments = path.split('.');
    let mut current = fields.get_mut(segments.next()?)?;
    for segment in segments {
        match current {
            FieldValue::Map(inner) => current = inner.get_mut(segment)?,
            _ => return None,
        }
    }
    Some(current)
}
