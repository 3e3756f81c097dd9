// --- File: crates/bienestar_slots/src/routes.rs ---

use crate::handlers::{
    check_slot_handler, get_availability_handler, get_range_availability_handler,
    health_handler, SharedSlotService, SlotState,
};
use axum::{
    routing::{get, post},
    Router,
};
use bienestar_common::SharedStore;
use bienestar_config::AppConfig;
use std::sync::Arc;

/// Builds the shared state from the loaded configuration and the selected store.
pub fn slot_state(config: &AppConfig, store: SharedStore) -> Arc<SlotState> {
    let service = SharedSlotService::new(store, &config.scheduling);
    Arc::new(SlotState { service })
}

/// Creates a router containing all availability routes. Mount it under `/api`.
pub fn routes(state: Arc<SlotState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/availability/range", get(get_range_availability_handler))
        .route("/availability/check", post(check_slot_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
