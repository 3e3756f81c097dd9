// --- File: crates/bienestar_slots/src/view.rs ---
//! Presentation-side state for a slot picker.
//!
//! A user may change the specialist or the date while a previous lookup is still in
//! flight. Every lookup takes a ticket from [`RequestSequencer`]; only the result
//! of the most recently issued ticket is applied, older ones are dropped.

use bienestar_common::AvailabilityStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::logic::{SlotRequest, NO_SLOTS_MESSAGE};
use crate::service::SlotService;
use crate::time::TimeOfDay;

/// Shown when the store could not be read.
pub const LOAD_FAILED_MESSAGE: &str = "no se pudieron cargar los horarios disponibles";

/// Identifies one issued lookup. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvailabilityState {
    #[default]
    Idle,
    Loading {
        request: SlotRequest,
    },
    Ready {
        request: SlotRequest,
        slots: Vec<TimeOfDay>,
    },
    Failed {
        request: SlotRequest,
        message: String,
    },
}

impl AvailabilityState {
    /// Slots to offer; empty unless the state is `Ready`.
    pub fn slots(&self) -> &[TimeOfDay] {
        match self {
            AvailabilityState::Ready { slots, .. } => slots,
            _ => &[],
        }
    }

    /// Message to show next to the slot list, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            AvailabilityState::Ready { slots, .. } if slots.is_empty() => Some(NO_SLOTS_MESSAGE),
            AvailabilityState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AvailabilityState::Loading { .. })
    }
}

/// What happened to the result of one `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(AvailabilityState),
    /// A newer request was issued while this one was in flight
    Stale,
}

#[derive(Debug, Default)]
pub struct AvailabilityView {
    sequencer: RequestSequencer,
    state: Mutex<AvailabilityState>,
}

impl AvailabilityView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AvailabilityState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset(&self) {
        self.sequencer.issue();
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = AvailabilityState::Idle;
    }

    /// Looks up bookable slots for `request` and applies the result unless a newer
    /// request was issued meanwhile. Store failures end in `Failed` with an empty
    /// slot list; they are never returned as errors.
    pub async fn load<S>(&self, service: &SlotService<S>, request: SlotRequest) -> LoadOutcome
    where
        S: AvailabilityStore + ?Sized,
    {
        let ticket = self.sequencer.issue();
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if self.sequencer.is_current(&ticket) {
                *state = AvailabilityState::Loading {
                    request: request.clone(),
                };
            }
        }

        let result = service
            .bookable_slots(
                &request.specialist_id,
                request.date,
                request.exclude_appointment_id.as_deref(),
            )
            .await;

        let next = match result {
            Ok(slots) => AvailabilityState::Ready { request, slots },
            Err(e) => {
                warn!("Availability lookup failed: {}", e);
                AvailabilityState::Failed {
                    request,
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        };

        // Checked under the lock so a newer request cannot slip in between.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.sequencer.is_current(&ticket) {
            debug!("Discarding stale availability result #{}", ticket.sequence());
            return LoadOutcome::Stale;
        }
        *state = next.clone();
        LoadOutcome::Applied(next)
    }
}
