//! Firestore implementation of `AvailabilityStore`.
//!
//! Queries filter on `specialistId` only; the calendar-day match happens here,
//! in the configured time zone, so no composite index is required.

use bienestar_common::{AvailabilityStore, BookedTime, BoxFuture, StoreError, WorkingWindow};
use bienestar_config::{AppConfig, FirestoreConfig};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::client::{FirestoreClient, FirestoreError};
use crate::models::{field_equals_query, Document};

pub struct FirestoreStore {
    client: FirestoreClient,
    schedules_collection: String,
    appointments_collection: String,
    time_zone: Tz,
}

impl FirestoreStore {
    pub fn new(client: FirestoreClient, config: &FirestoreConfig, time_zone: Tz) -> Self {
        Self {
            client,
            schedules_collection: config.schedules_collection.clone(),
            appointments_collection: config.appointments_collection.clone(),
            time_zone,
        }
    }

    /// Builds the store from the application config.
    ///
    /// # Errors
    ///
    /// Fails when the `firestore` section is missing, has no project id, or the key
    /// file cannot be read.
    pub async fn from_app_config(config: &AppConfig) -> Result<Self, FirestoreError> {
        let firestore = config.firestore.as_ref().ok_or_else(|| {
            FirestoreError::ConfigError("Missing [firestore] section".to_string())
        })?;
        let client = FirestoreClient::from_config(firestore).await?;
        Ok(Self::new(client, firestore, config.time_zone()))
    }

    async fn documents_for(
        &self,
        collection: &str,
        specialist_id: &str,
    ) -> Result<Vec<Document>, FirestoreError> {
        let query = field_equals_query(collection, "specialistId", specialist_id);
        self.client.run_query(&query).await
    }

    async fn windows_in(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkingWindow>, StoreError> {
        let documents = self
            .documents_for(&self.schedules_collection, specialist_id)
            .await?;
        let windows: Vec<WorkingWindow> = documents
            .iter()
            .filter_map(|doc| match doc.to_working_window(self.time_zone) {
                Ok(window) => Some(window),
                Err(e) => {
                    warn!("Skipping schedule document: {}", e);
                    None
                }
            })
            .filter(|w| w.specialist_id == specialist_id && w.date >= start && w.date <= end)
            .collect();
        debug!(
            "Firestore: {} windows for {} between {} and {}",
            windows.len(),
            specialist_id,
            start,
            end
        );
        Ok(windows)
    }

    async fn booked_in(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BookedTime>, StoreError> {
        let documents = self
            .documents_for(&self.appointments_collection, specialist_id)
            .await?;
        Ok(documents
            .iter()
            .filter_map(|doc| match doc.to_booked_time(self.time_zone) {
                Ok(booked) => Some(booked),
                Err(e) => {
                    warn!("Skipping appointment document: {}", e);
                    None
                }
            })
            .filter(|b| b.specialist_id == specialist_id && b.date >= start && b.date <= end)
            .collect())
    }
}

impl AvailabilityStore for FirestoreStore {
    type Error = StoreError;

    fn working_windows(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move { self.windows_in(&specialist_id, date, date).await })
    }

    fn booked_times(
        &self,
        specialist_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move { self.booked_in(&specialist_id, date, date).await })
    }

    fn working_windows_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move { self.windows_in(&specialist_id, start, end).await })
    }

    fn booked_times_between(
        &self,
        specialist_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
        let specialist_id = specialist_id.to_string();
        Box::pin(async move { self.booked_in(&specialist_id, start, end).await })
    }
}
