// --- File: crates/bienestar_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod memory; // In-memory availability store
pub mod models; // Schedule and appointment records
pub mod services; // Store abstractions

// Re-export error types and utilities for easier access
pub use error::{
    conflict, external_service_error, internal_error, not_found, service_unavailable,
    unprocessable, validation_error, BienestarError, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{handle_json_result, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};

pub use memory::InMemoryStore;
pub use models::{BookedTime, SeedData, WorkingWindow};
pub use services::{AvailabilityStore, BoxFuture, SharedStore, StoreError};
