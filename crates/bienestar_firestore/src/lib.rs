//! Firestore integration for Bienestar
//!
//! Reads specialist schedules and appointments from Cloud Firestore through its REST
//! API and exposes them as an `AvailabilityStore`.
//!
//! # Example
//!
//! ```rust,no_run
//! use bienestar_common::SharedStore;
//! use bienestar_config::AppConfig;
//! use bienestar_firestore::FirestoreStore;
//! use std::sync::Arc;
//!
//! async fn build_store(config: &AppConfig) -> Result<SharedStore, Box<dyn std::error::Error>> {
//!     let store = FirestoreStore::from_app_config(config).await?;
//!     Ok(Arc::new(store))
//! }
//! ```

pub mod auth;
pub mod client;
pub mod models;
pub mod repository;

pub use client::{FirestoreClient, FirestoreError};
pub use repository::FirestoreStore;
