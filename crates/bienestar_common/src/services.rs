// --- File: crates/bienestar_common/src/services.rs ---
//! Store abstractions for the scheduling core.
//!
//! The slot computation never talks to a database directly; it reads working windows
//! and booked times through [`AvailabilityStore`]. This keeps the core testable with
//! the in-memory store and lets the backend swap in Firestore at startup.

use chrono::NaiveDate;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{BookedTime, WorkingWindow};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors surfaced by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (network, auth, outage)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but the call failed
    #[error("Store error: {0}")]
    Backend(#[from] Box<dyn StdError + Send + Sync>),
}

/// Read access to the schedule and appointment collections.
///
/// Implementations may return records that do not match the requested specialist or
/// day (for example when the backend cannot filter server-side); callers re-check
/// with [`WorkingWindow::matches`] and [`BookedTime::matches`].
pub trait AvailabilityStore: Send + Sync {
    /// Error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Working windows declared by `specialist_id` on `date`.
    fn working_windows(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error>;

    /// Appointment times booked with `specialist_id` on `date`.
    fn booked_times(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error>;

    /// Working windows for `specialist_id` on every day of the inclusive range.
    fn working_windows_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error>;

    /// Booked times for `specialist_id` on every day of the inclusive range.
    fn booked_times_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error>;
}

/// Store handle shared between handlers; every concrete store reports `StoreError`.
pub type SharedStore = Arc<dyn AvailabilityStore<Error = StoreError>>;
