// --- File: crates/bienestar_slots/src/service.rs ---
//! Availability service.
//!
//! `SlotService` is the single entry point for every flow that needs bookable times:
//! the booking form, the date-bound reschedule and the whole-schedule reschedule all
//! go through it, with the same increment and the same self-exclusion rule.

use bienestar_common::AvailabilityStore;
use bienestar_config::SchedulingConfig;
use chrono::NaiveDate;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::logic::{
    aggregate_slots, filter_available, normalize_booked, DayAvailability, SlotError,
};
use crate::time::TimeOfDay;

/// Computes bookable slots from any [`AvailabilityStore`].
pub struct SlotService<S: ?Sized> {
    store: Arc<S>,
    increment_minutes: u32,
    max_range_days: u32,
}

impl<S: ?Sized> Clone for SlotService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            increment_minutes: self.increment_minutes,
            max_range_days: self.max_range_days,
        }
    }
}

fn unavailable<E: Display>(what: &str, err: E) -> SlotError {
    error!("Failed to fetch {}: {}", what, err);
    SlotError::DataUnavailable(format!("could not load {}: {}", what, err))
}

impl<S> SlotService<S>
where
    S: AvailabilityStore + ?Sized,
{
    pub fn new(store: Arc<S>, scheduling: &SchedulingConfig) -> Self {
        Self {
            store,
            increment_minutes: scheduling.slot_increment_minutes,
            max_range_days: scheduling.max_range_days,
        }
    }

    /// Service with the default range cap and a custom increment.
    pub fn with_increment(store: Arc<S>, increment_minutes: u32) -> Self {
        Self::new(
            store,
            &SchedulingConfig {
                slot_increment_minutes: increment_minutes,
                ..SchedulingConfig::default()
            },
        )
    }

    pub fn increment_minutes(&self) -> u32 {
        self.increment_minutes
    }

    pub fn max_range_days(&self) -> u32 {
        self.max_range_days
    }

    /// Every slot the specialist's windows open on `date`, ignoring bookings.
    pub async fn slots_for_date(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeOfDay>, SlotError> {
        let windows = self
            .store
            .working_windows(specialist_id, date)
            .await
            .map_err(|e| unavailable("working windows", e))?;
        Ok(aggregate_slots(
            &windows,
            specialist_id,
            date,
            self.increment_minutes,
        ))
    }

    /// Slots on `date` that are still free. When rescheduling, pass the appointment
    /// being moved as `exclude_appointment_id` so its own slot stays offered.
    pub async fn bookable_slots(
        &self,
        specialist_id: &str,
        date: NaiveDate,
        exclude_appointment_id: Option<&str>,
    ) -> Result<Vec<TimeOfDay>, SlotError> {
        let candidates = self.slots_for_date(specialist_id, date).await?;
        if candidates.is_empty() {
            debug!("No working windows for {} on {}", specialist_id, date);
            return Ok(candidates);
        }

        let free = self
            .remove_booked(&candidates, specialist_id, date, exclude_appointment_id)
            .await?;
        info!(
            "{} of {} slots bookable for {} on {}",
            free.len(),
            candidates.len(),
            specialist_id,
            date
        );
        Ok(free)
    }

    /// Bookable slots for each day in `start..=end`, omitting days with nothing free.
    ///
    /// Reads the store twice for the whole range rather than twice per day.
    pub async fn bookable_slots_in_range(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_appointment_id: Option<&str>,
    ) -> Result<Vec<DayAvailability>, SlotError> {
        if end < start {
            return Err(SlotError::InvalidRange(
                "end_date must not be before start_date".to_string(),
            ));
        }
        let span = (end - start).num_days() + 1;
        if span > i64::from(self.max_range_days) {
            return Err(SlotError::InvalidRange(format!(
                "range spans {} days, at most {} allowed",
                span, self.max_range_days
            )));
        }

        let windows = self
            .store
            .working_windows_between(specialist_id, start, end)
            .await
            .map_err(|e| unavailable("working windows", e))?;
        let booked = self
            .store
            .booked_times_between(specialist_id, start, end)
            .await
            .map_err(|e| unavailable("booked times", e))?;

        let days: Vec<DayAvailability> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter_map(|date| {
                let candidates =
                    aggregate_slots(&windows, specialist_id, date, self.increment_minutes);
                if candidates.is_empty() {
                    return None;
                }
                let todays: Vec<_> = booked
                    .iter()
                    .filter(|b| b.matches(specialist_id, date))
                    .cloned()
                    .collect();
                let slots = filter_available(
                    &candidates,
                    &normalize_booked(&todays),
                    exclude_appointment_id,
                );
                (!slots.is_empty()).then_some(DayAvailability { date, slots })
            })
            .collect();

        info!(
            "{} days with availability for {} between {} and {}",
            days.len(),
            specialist_id,
            start,
            end
        );
        Ok(days)
    }

    /// Final check before an appointment is written.
    ///
    /// Re-reads both collections, so a slot taken since the list was shown is caught
    /// here. `time` may be in any stored format; the normalised time is returned.
    pub async fn ensure_bookable(
        &self,
        specialist_id: &str,
        date: NaiveDate,
        time: &str,
        exclude_appointment_id: Option<&str>,
    ) -> Result<TimeOfDay, SlotError> {
        let time = TimeOfDay::parse_lenient(time)?;

        let schedule = self.slots_for_date(specialist_id, date).await?;
        if !schedule.contains(&time) {
            return Err(SlotError::OutsideSchedule { date, time });
        }

        let free = self
            .remove_booked(&[time], specialist_id, date, exclude_appointment_id)
            .await?;
        if free.is_empty() {
            info!("Rejecting {} on {} for {}: slot taken", time, date, specialist_id);
            return Err(SlotError::SlotTaken { date, time });
        }
        Ok(time)
    }

    async fn remove_booked(
        &self,
        candidates: &[TimeOfDay],
        specialist_id: &str,
        date: NaiveDate,
        exclude_appointment_id: Option<&str>,
    ) -> Result<Vec<TimeOfDay>, SlotError> {
        let mut booked = self
            .store
            .booked_times(specialist_id, date)
            .await
            .map_err(|e| unavailable("booked times", e))?;
        booked.retain(|b| b.matches(specialist_id, date));
        let occupied = normalize_booked(&booked);
        Ok(filter_available(candidates, &occupied, exclude_appointment_id))
    }
}
