// --- File: crates/services/bienestar_backend/src/store_factory.rs ---
//! Picks the availability store at startup.
//!
//! `use_firestore = true` reads schedules and appointments from Cloud Firestore.
//! Otherwise an in-memory store is used, seeded from `[seed].path` when configured.

use bienestar_common::{BienestarError, InMemoryStore, SharedStore};
use bienestar_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the store selected by the configuration.
///
/// # Errors
///
/// Fails when Firestore is selected but cannot be set up, or when the seed file
/// cannot be read.
pub async fn build_store(config: &AppConfig) -> Result<SharedStore, BienestarError> {
    if config.use_firestore {
        return firestore_store(config).await;
    }

    match &config.seed {
        Some(seed) => {
            let store = InMemoryStore::from_config(seed)?;
            info!("Using in-memory store seeded from {}", seed.path);
            Ok(Arc::new(store))
        }
        None => {
            warn!("No store configured; starting with an empty in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

#[cfg(feature = "firestore")]
async fn firestore_store(config: &AppConfig) -> Result<SharedStore, BienestarError> {
    let store = bienestar_firestore::FirestoreStore::from_app_config(config).await?;
    info!(
        "Using Firestore store (time zone {})",
        config.scheduling.time_zone
    );
    Ok(Arc::new(store))
}

#[cfg(not(feature = "firestore"))]
async fn firestore_store(_config: &AppConfig) -> Result<SharedStore, BienestarError> {
    Err(bienestar_common::internal_error(
        "use_firestore is set but the binary was built without the `firestore` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bienestar_common::{AvailabilityStore, HttpStatusCode};
    use bienestar_config::SeedConfig;

    #[tokio::test]
    async fn test_empty_memory_store_by_default() {
        let store = build_store(&AppConfig::default()).await.unwrap();
        let date = "2024-06-10".parse().unwrap();
        assert!(store.working_windows("S1", date).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seeded_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{"windows": [{"id": "w1", "specialistId": "S1", "date": "2024-06-10", "startTime": "08:00", "endTime": "10:00"}]}"#,
        )
        .unwrap();

        let config = AppConfig {
            seed: Some(SeedConfig {
                path: path.to_string_lossy().into_owned(),
            }),
            ..AppConfig::default()
        };
        let store = build_store(&config).await.unwrap();
        let date = "2024-06-10".parse().unwrap();
        assert_eq!(store.working_windows("S1", date).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails() {
        let config = AppConfig {
            seed: Some(SeedConfig {
                path: "/nonexistent/seed.json".to_string(),
            }),
            ..AppConfig::default()
        };
        assert!(build_store(&config).await.is_err());
    }

    #[cfg(feature = "firestore")]
    #[tokio::test]
    async fn test_firestore_without_section_is_config_error() {
        let config = AppConfig {
            use_firestore: true,
            ..AppConfig::default()
        };
        let err = build_store(&config).await.err().unwrap();
        assert_eq!(err.status_code(), 500);
    }
}
