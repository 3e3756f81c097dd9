// --- File: crates/bienestar_slots/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;
pub mod time;
pub mod view;
#[cfg(test)]
mod view_test;

pub use logic::{SlotError, SlotRequest, NO_SLOTS_MESSAGE};
pub use service::SlotService;
pub use time::{TimeOfDay, TimeParseError};
pub use view::{AvailabilityState, AvailabilityView, LoadOutcome, RequestSequencer, RequestTicket};
