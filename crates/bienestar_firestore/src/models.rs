//! Firestore REST wire types and document decoding.
//!
//! Documents come back with every field wrapped in a type tag
//! (`{"stringValue": "S1"}`, `{"timestampValue": "2024-06-10T00:00:00Z"}`); this module
//! turns them into the shared `WorkingWindow` and `BookedTime` records.

use bienestar_common::{BookedTime, WorkingWindow};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use crate::client::FirestoreError;

/// A typed Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// int64 values are encoded as strings
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

/// One element of a `:runQuery` response stream. Elements without a document only
/// carry progress information.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    pub document: Option<Document>,
    pub read_time: Option<String>,
}

/// Structured query selecting every document of `collection` whose `field` equals `value`.
pub fn field_equals_query(collection: &str, field: &str, value: &str) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": { "stringValue": value }
                }
            }
        }
    })
}

impl Document {
    /// The last path segment of `name`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn decode_error(&self, reason: impl Into<String>) -> FirestoreError {
        FirestoreError::DecodeError {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Reads a text field; integer values are accepted and rendered in decimal.
    pub fn string_field(&self, field: &str) -> Result<String, FirestoreError> {
        match self.fields.get(field) {
            Some(Value::StringValue(s)) => Ok(s.clone()),
            Some(Value::IntegerValue(i)) => Ok(i.clone()),
            Some(other) => Err(self.decode_error(format!(
                "field '{}' has unexpected type {:?}",
                field, other
            ))),
            None => Err(self.decode_error(format!("missing field '{}'", field))),
        }
    }

    /// Reads the calendar day of a date field.
    ///
    /// Timestamps are converted to `tz` before the day is taken, so an appointment
    /// saved as local midnight lands on the right day. `YYYY-MM-DD` strings (and
    /// RFC 3339 strings) are accepted as well.
    pub fn date_field(&self, field: &str, tz: Tz) -> Result<NaiveDate, FirestoreError> {
        let raw = match self.fields.get(field) {
            Some(Value::TimestampValue(ts)) => ts,
            Some(Value::StringValue(s)) => s,
            Some(other) => {
                return Err(self.decode_error(format!(
                    "field '{}' has unexpected type {:?}",
                    field, other
                )))
            }
            None => return Err(self.decode_error(format!("missing field '{}'", field))),
        };
        calendar_day(raw, tz)
            .ok_or_else(|| self.decode_error(format!("field '{}' is not a date: {}", field, raw)))
    }

    pub fn to_working_window(&self, tz: Tz) -> Result<WorkingWindow, FirestoreError> {
        Ok(WorkingWindow {
            id: self.id().to_string(),
            specialist_id: self.string_field("specialistId")?,
            date: self.date_field("date", tz)?,
            start_time: self.string_field("startTime")?,
            end_time: self.string_field("endTime")?,
        })
    }

    pub fn to_booked_time(&self, tz: Tz) -> Result<BookedTime, FirestoreError> {
        Ok(BookedTime {
            appointment_id: self.id().to_string(),
            specialist_id: self.string_field("specialistId")?,
            date: self.date_field("date", tz)?,
            time: self.string_field("time")?,
        })
    }
}

/// The day `raw` falls on in `tz`.
pub fn calendar_day(raw: &str, tz: Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&tz).date_naive())
}
