// --- File: crates/bienestar_common/src/models.rs ---

// Records read from the document store. Field names follow the stored documents
// (camelCase), so seed files and Firestore documents share one shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A specialist's declared block of availability on one calendar day.
///
/// `start_time` and `end_time` are kept exactly as stored; they are parsed (and
/// malformed values rejected) when slots are generated, not when the record is read.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingWindow {
    /// Document identifier
    pub id: String,
    /// Specialist the window belongs to
    pub specialist_id: String,
    /// Calendar day; time-of-day is not part of the match
    pub date: NaiveDate,
    /// Opening wall-clock time, normally `HH:MM`
    pub start_time: String,
    /// Closing wall-clock time, normally `HH:MM`; never itself a slot
    pub end_time: String,
}

impl WorkingWindow {
    pub fn new(
        id: impl Into<String>,
        specialist_id: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            specialist_id: specialist_id.into(),
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// True when this window belongs to `specialist_id` on `date`.
    pub fn matches(&self, specialist_id: &str, date: NaiveDate) -> bool {
        self.specialist_id == specialist_id && self.date == date
    }
}

/// Projection of an appointment used only to compute occupancy.
///
/// `time` is the raw stored value. The portal has written both `"10:00"` and
/// `"10:00 a.m."` styles, so consumers normalise before comparing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedTime {
    /// Identifier of the appointment holding the slot
    pub appointment_id: String,
    pub specialist_id: String,
    pub date: NaiveDate,
    pub time: String,
}

impl BookedTime {
    pub fn new(
        appointment_id: impl Into<String>,
        specialist_id: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
    ) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            specialist_id: specialist_id.into(),
            date,
            time: time.into(),
        }
    }

    pub fn matches(&self, specialist_id: &str, date: NaiveDate) -> bool {
        self.specialist_id == specialist_id && self.date == date
    }
}

/// Contents of a seed file for the in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub windows: Vec<WorkingWindow>,
    #[serde(default)]
    pub appointments: Vec<BookedTime>,
}
