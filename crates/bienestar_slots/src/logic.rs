// --- File: crates/bienestar_slots/src/logic.rs ---
use bienestar_common::{BienestarError, BookedTime, WorkingWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::time::{TimeOfDay, TimeParseError};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Shown to users when a specialist has nothing open on the requested day.
pub const NO_SLOTS_MESSAGE: &str = "no hay horarios disponibles para esta fecha";

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Availability data unavailable: {0}")]
    DataUnavailable(String),
    #[error("Failed to parse time: {0}")]
    TimeParse(#[from] TimeParseError),
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("{time} on {date} is already booked")]
    SlotTaken { date: NaiveDate, time: TimeOfDay },
    #[error("{time} on {date} is outside the specialist's schedule")]
    OutsideSchedule { date: NaiveDate, time: TimeOfDay },
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl From<SlotError> for BienestarError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::DataUnavailable(msg) => BienestarError::DataUnavailable(msg),
            SlotError::TimeParse(e) => BienestarError::ValidationError(e.to_string()),
            SlotError::InvalidRange(msg) => BienestarError::ValidationError(msg),
            SlotError::Validation(msg) => BienestarError::ValidationError(msg),
            e @ SlotError::SlotTaken { .. } => BienestarError::ConflictError(e.to_string()),
            e @ SlotError::OutsideSchedule { .. } => {
                BienestarError::UnprocessableError(e.to_string())
            }
        }
    }
}

// --- Data Structures ---

/// The (specialist, day) pair a caller wants availability for. When rescheduling,
/// `exclude_appointment_id` names the appointment being moved so its own slot is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub specialist_id: String,
    pub date: NaiveDate,
    pub exclude_appointment_id: Option<String>,
}

impl SlotRequest {
    pub fn new(specialist_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            specialist_id: specialist_id.into(),
            date,
            exclude_appointment_id: None,
        }
    }

    pub fn excluding(mut self, appointment_id: impl Into<String>) -> Self {
        self.exclude_appointment_id = Some(appointment_id.into());
        self
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Specialist identifier
    #[cfg_attr(feature = "openapi", schema(example = "S1"))]
    pub specialist_id: String,

    /// Day in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-10"))]
    pub date: String,

    /// Appointment being rescheduled; its current slot counts as free
    pub exclude_appointment_id: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    pub specialist_id: String,
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub slots: Vec<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AvailabilityResponse {
    pub fn new(specialist_id: String, date: NaiveDate, slots: Vec<TimeOfDay>) -> Self {
        let message = slots.is_empty().then(|| NO_SLOTS_MESSAGE.to_string());
        Self {
            specialist_id,
            date,
            slots,
            message,
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RangeAvailabilityQuery {
    pub specialist_id: String,
    /// First day in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-10"))]
    pub start_date: String,
    /// Last day (inclusive) in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-14"))]
    pub end_date: String,
    pub exclude_appointment_id: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DayAvailability {
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub slots: Vec<TimeOfDay>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RangeAvailabilityResponse {
    pub specialist_id: String,
    pub days: Vec<DayAvailability>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckSlotRequest {
    pub specialist_id: String,
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-10"))]
    pub date: String,
    /// Any stored format: "09:30", "9:30 a.m.", "09:30:00"
    #[cfg_attr(feature = "openapi", schema(example = "09:30"))]
    pub time: String,
    pub exclude_appointment_id: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckSlotResponse {
    pub bookable: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:30"))]
    pub time: TimeOfDay,
}

/// A booked appointment reduced to what occupancy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedSlot {
    pub appointment_id: String,
    pub time: TimeOfDay,
}

// --- Slot Logic ---

/// Parses `"YYYY-MM-DD"` into a calendar day.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, SlotError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| SlotError::Validation(format!("Invalid {} format (YYYY-MM-DD)", field)))
}

/// Expands one window into slot start times spaced `increment_minutes` apart.
///
/// Slots start at `start` and stay strictly before `end`. A window shorter than one
/// increment yields nothing, as does a zero increment.
pub fn generate_slots(start: TimeOfDay, end: TimeOfDay, increment_minutes: u32) -> Vec<TimeOfDay> {
    if increment_minutes == 0 || start >= end {
        return Vec::new();
    }
    if end.minutes() - start.minutes() < increment_minutes {
        return Vec::new();
    }

    (start.minutes()..end.minutes())
        .step_by(increment_minutes as usize)
        .filter_map(TimeOfDay::from_minutes)
        .collect()
}

/// Reads a window's bounds with the strict `HH:MM` parser.
pub fn window_bounds(window: &WorkingWindow) -> Result<(TimeOfDay, TimeOfDay), TimeParseError> {
    let start = TimeOfDay::parse(&window.start_time)?;
    let end = TimeOfDay::parse(&window.end_time)?;
    Ok((start, end))
}

/// Union of the slots of every window belonging to `specialist_id` on `date`,
/// deduplicated and ascending.
///
/// Windows for other specialists or days are ignored. Windows whose times cannot be
/// parsed are skipped with a warning; the rest still contribute.
pub fn aggregate_slots(
    windows: &[WorkingWindow],
    specialist_id: &str,
    date: NaiveDate,
    increment_minutes: u32,
) -> Vec<TimeOfDay> {
    let mut slots: Vec<TimeOfDay> = windows
        .iter()
        .filter(|window| window.matches(specialist_id, date))
        .filter_map(|window| match window_bounds(window) {
            Ok(bounds) => Some(bounds),
            Err(e) => {
                warn!(
                    window_id = %window.id,
                    specialist_id,
                    %date,
                    "Skipping malformed working window: {}",
                    e
                );
                None
            }
        })
        .flat_map(|(start, end)| generate_slots(start, end, increment_minutes))
        .collect();

    slots.sort_unstable();
    slots.dedup();
    debug!(
        "Aggregated {} slots for {} on {} (increment {} min)",
        slots.len(),
        specialist_id,
        date,
        increment_minutes
    );
    slots
}

/// Normalises booked times with the lenient parser. Unreadable times cannot match any
/// generated slot, so they are logged and dropped.
pub fn normalize_booked(booked: &[BookedTime]) -> Vec<OccupiedSlot> {
    booked
        .iter()
        .filter_map(|booking| match TimeOfDay::parse_lenient(&booking.time) {
            Ok(time) => Some(OccupiedSlot {
                appointment_id: booking.appointment_id.clone(),
                time,
            }),
            Err(e) => {
                warn!(
                    appointment_id = %booking.appointment_id,
                    "Ignoring booked time that cannot be read: {}",
                    e
                );
                None
            }
        })
        .collect()
}

/// Keeps the candidates no booking holds, in their original order.
///
/// The booking whose id equals `exclude_appointment_id` does not occupy its time; any
/// other booking at that time still does.
pub fn filter_available(
    candidates: &[TimeOfDay],
    occupied: &[OccupiedSlot],
    exclude_appointment_id: Option<&str>,
) -> Vec<TimeOfDay> {
    candidates
        .iter()
        .copied()
        .filter(|slot| {
            !occupied.iter().any(|booking| {
                booking.time == *slot
                    && Some(booking.appointment_id.as_str()) != exclude_appointment_id
            })
        })
        .collect()
}
