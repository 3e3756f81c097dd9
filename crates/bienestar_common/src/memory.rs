// --- File: crates/bienestar_common/src/memory.rs ---
//! In-memory implementation of [`AvailabilityStore`].
//!
//! Used by the backend when Firestore is disabled (optionally seeded from a JSON
//! file) and by tests across the workspace.

use chrono::NaiveDate;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

use crate::error::BienestarError;
use crate::models::{BookedTime, SeedData, WorkingWindow};
use crate::services::{AvailabilityStore, BoxFuture, StoreError};
use bienestar_config::SeedConfig;

/// Availability store holding every record in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<SeedData>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            data: RwLock::new(seed),
            offline: AtomicBool::new(false),
        }
    }

    /// Reads a [`SeedData`] JSON document from disk.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, BienestarError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        info!(
            "Seeded in-memory store from {} ({} windows, {} appointments)",
            path.display(),
            seed.windows.len(),
            seed.appointments.len()
        );
        Ok(Self::from_seed(seed))
    }

    pub fn from_config(config: &SeedConfig) -> Result<Self, BienestarError> {
        Self::from_seed_file(&config.path)
    }

    pub fn add_window(&self, window: WorkingWindow) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .push(window);
    }

    pub fn add_booking(&self, booking: BookedTime) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .appointments
            .push(booking);
    }

    /// Books `time` and returns the generated appointment id.
    pub fn book(&self, specialist_id: &str, date: NaiveDate, time: &str) -> String {
        let appointment_id = format!("apt-{}", uuid::Uuid::new_v4());
        self.add_booking(BookedTime::new(
            appointment_id.clone(),
            specialist_id,
            date,
            time,
        ));
        appointment_id
    }

    /// Removes an appointment. Returns `false` when no appointment had that id.
    pub fn cancel(&self, appointment_id: &str) -> bool {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        let before = data.appointments.len();
        data.appointments
            .retain(|booking| booking.appointment_id != appointment_id);
        before != data.appointments.len()
    }

    /// Simulates an outage: every read fails with [`StoreError::Unavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn windows_where<F>(&self, keep: F) -> Vec<WorkingWindow>
    where
        F: Fn(&WorkingWindow) -> bool,
    {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.windows.iter().filter(|w| keep(w)).cloned().collect()
    }

    fn bookings_where<F>(&self, keep: F) -> Vec<BookedTime>
    where
        F: Fn(&BookedTime) -> bool,
    {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.appointments.iter().filter(|b| keep(b)).cloned().collect()
    }
}

impl AvailabilityStore for InMemoryStore {
    type Error = StoreError;

    fn working_windows(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move {
            self.ensure_online()?;
            let windows = self.windows_where(|w| w.matches(&specialist_id, date));
            debug!(
                "In-memory store: {} windows for {} on {}",
                windows.len(),
                specialist_id,
                date
            );
            Ok(windows)
        })
    }

    fn booked_times(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move {
            self.ensure_online()?;
            Ok(self.bookings_where(|b| b.matches(&specialist_id, date)))
        })
    }

    fn working_windows_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move {
            self.ensure_online()?;
            Ok(self.windows_where(|w| {
                w.specialist_id == specialist_id && w.date >= start && w.date <= end
            }))
        })
    }

    fn booked_times_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move {
            self.ensure_online()?;
            Ok(self.bookings_where(|b| {
                b.specialist_id == specialist_id && b.date >= start && b.date <= end
            }))
        })
    }
}
