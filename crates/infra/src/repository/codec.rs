//! Conversion between typed entities and store documents.
//!
//! Timestamps travel through serde as RFC 3339 strings; this is the one place
//! they are turned into `StoreTimestamp` on the way in and back on the way out.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::document::value::{fields_to_json, lookup_mut};
use crate::document::{Document, FieldValue, Fields, StoreTimestamp};

/// Serialize `value` into top-level document fields, converting the string
/// values found at `timestamp_paths` into store timestamps.
pub fn encode<T: Serialize + ?Sized>(value: &T, timestamp_paths: &[&str]) -> Result<Fields, String> {
    let json = serde_json::to_value(value).map_err(|e| e.to_string())?;
    let FieldValue::Map(mut fields) = FieldValue::from_json(json) else {
        return Err("expected a JSON object".to_string());
    };

    for path in timestamp_paths {
        let Some(slot) = lookup_mut(&mut fields, path) else {
            continue;
        };
        let FieldValue::String(raw) = &*slot else {
            continue;
        };
        let parsed = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| format!("{path}: {e}"))?
            .with_timezone(&Utc);
        *slot = FieldValue::Timestamp(StoreTimestamp::from_datetime(parsed));
    }

    Ok(fields)
}

/// Deserialize a stored document, exposing its id as the `id` field.
pub fn decode<T: DeserializeOwned>(document: &Document) -> Result<T, String> {
    let mut object = fields_to_json(&document.fields);
    object.insert("id".to_string(), JsonValue::String(document.id.clone()));
    serde_json::from_value(JsonValue::Object(object)).map_err(|e| e.to_string())
}
