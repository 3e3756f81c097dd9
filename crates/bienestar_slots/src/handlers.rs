// File: crates/bienestar_slots/src/handlers.rs
use crate::logic::{
    parse_date, AvailabilityQuery, AvailabilityResponse, CheckSlotRequest, CheckSlotResponse,
    RangeAvailabilityQuery, RangeAvailabilityResponse,
};
use crate::service::SlotService;
use axum::{
    extract::{Query, State},
    response::Json,
};
use bienestar_common::{validation_error, AvailabilityStore, BienestarError, StoreError};
use std::sync::Arc;
use tracing::info;

/// Slot service over whichever store the backend selected at startup.
pub type SharedSlotService = SlotService<dyn AvailabilityStore<Error = StoreError>>;

// Define shared state needed by the availability handlers
#[derive(Clone)]
pub struct SlotState {
    pub service: SharedSlotService,
}

fn require_specialist(specialist_id: &str) -> Result<&str, BienestarError> {
    let trimmed = specialist_id.trim();
    if trimmed.is_empty() {
        return Err(validation_error("specialist_id must not be empty"));
    }
    Ok(trimmed)
}

/// Handler to get the bookable slots of one specialist on one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots, ascending", body = AvailabilityResponse),
        (status = 400, description = "Invalid date or specialist"),
        (status = 503, description = "Schedule data could not be loaded")
    ),
    tag = "Availability"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<SlotState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, BienestarError> {
    let specialist_id = require_specialist(&query.specialist_id)?;
    let date = parse_date("date", &query.date)?;

    let slots = state
        .service
        .bookable_slots(specialist_id, date, query.exclude_appointment_id.as_deref())
        .await?;

    Ok(Json(AvailabilityResponse::new(
        specialist_id.to_string(),
        date,
        slots,
    )))
}

/// Handler to get bookable slots for every day of a date range.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability/range",
    params(RangeAvailabilityQuery),
    responses(
        (status = 200, description = "Days with at least one bookable slot", body = RangeAvailabilityResponse),
        (status = 400, description = "Invalid dates or range too long"),
        (status = 503, description = "Schedule data could not be loaded")
    ),
    tag = "Availability"
))]
pub async fn get_range_availability_handler(
    State(state): State<Arc<SlotState>>,
    Query(query): Query<RangeAvailabilityQuery>,
) -> Result<Json<RangeAvailabilityResponse>, BienestarError> {
    let specialist_id = require_specialist(&query.specialist_id)?;
    let start = parse_date("start_date", &query.start_date)?;
    let end = parse_date("end_date", &query.end_date)?;
    info!("Range availability for {}: {} to {}", specialist_id, start, end);

    let days = state
        .service
        .bookable_slots_in_range(
            specialist_id,
            start,
            end,
            query.exclude_appointment_id.as_deref(),
        )
        .await?;

    Ok(Json(RangeAvailabilityResponse {
        specialist_id: specialist_id.to_string(),
        days,
    }))
}

/// Handler the booking write path calls right before committing an appointment.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/availability/check",
    request_body = CheckSlotRequest,
    responses(
        (status = 200, description = "The time can be booked", body = CheckSlotResponse),
        (status = 400, description = "Invalid date or time"),
        (status = 409, description = "The slot is already booked"),
        (status = 422, description = "The time is not within the specialist's schedule"),
        (status = 503, description = "Schedule data could not be loaded")
    ),
    tag = "Availability"
))]
pub async fn check_slot_handler(
    State(state): State<Arc<SlotState>>,
    Json(request): Json<CheckSlotRequest>,
) -> Result<Json<CheckSlotResponse>, BienestarError> {
    let specialist_id = require_specialist(&request.specialist_id)?;
    let date = parse_date("date", &request.date)?;

    let time = state
        .service
        .ensure_bookable(
            specialist_id,
            date,
            &request.time,
            request.exclude_appointment_id.as_deref(),
        )
        .await?;

    Ok(Json(CheckSlotResponse {
        bookable: true,
        time,
    }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
