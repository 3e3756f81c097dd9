// File: crates/bienestar_slots/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailabilityQuery, AvailabilityResponse, CheckSlotRequest, CheckSlotResponse,
    DayAvailability, RangeAvailabilityQuery, RangeAvailabilityResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::get_range_availability_handler,
        crate::handlers::check_slot_handler,
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            RangeAvailabilityQuery,
            RangeAvailabilityResponse,
            DayAvailability,
            CheckSlotRequest,
            CheckSlotResponse
        )
    ),
    tags(
        (name = "Availability", description = "Specialist appointment availability")
    ),
    servers(
        (url = "/api", description = "Bienestar API server")
    )
)]
pub struct SlotsApiDoc;
