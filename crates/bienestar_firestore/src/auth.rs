//! Authentication for the Firestore REST API
//!
//! Tokens are minted from a service account key file with the datastore scope.
//! Without a key file requests go out unauthenticated, which is what the Firestore
//! emulator expects.

use bienestar_config::FirestoreConfig;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use yup_oauth2::{read_service_account_key, AccessToken, ServiceAccountAuthenticator, ServiceAccountKey};

use crate::client::FirestoreError;

/// OAuth scope granting read/write access to Cloud Firestore
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Supplies bearer tokens for Firestore requests, reusing a token until it expires.
pub struct TokenProvider {
    key: Option<ServiceAccountKey>,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    /// Reads the service account key named by `key_path`, if any.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::AuthError` when the key file cannot be read.
    pub async fn from_config(config: &FirestoreConfig) -> Result<Self, FirestoreError> {
        let Some(key_path) = config.key_path.as_deref() else {
            warn!("No Firestore key_path configured; sending unauthenticated requests");
            return Ok(Self::anonymous());
        };

        let key = read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| {
                FirestoreError::AuthError(format!("cannot read key file {}: {}", key_path, e))
            })?;
        Ok(Self {
            key: Some(key),
            cached: Mutex::new(None),
        })
    }

    /// Provider that never attaches credentials (emulator, tests).
    pub fn anonymous() -> Self {
        Self {
            key: None,
            cached: Mutex::new(None),
        }
    }

    /// Returns a bearer token, or `None` for the anonymous provider.
    pub async fn bearer(&self) -> Result<Option<String>, FirestoreError> {
        let Some(key) = &self.key else {
            return Ok(None);
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            if let Some(value) = token.token() {
                return Ok(Some(value.to_string()));
            }
        }

        debug!("Requesting a new Firestore access token");
        let auth = ServiceAccountAuthenticator::builder(key.clone())
            .build()
            .await
            .map_err(|e| FirestoreError::AuthError(e.to_string()))?;
        let token = auth
            .token(&[DATASTORE_SCOPE])
            .await
            .map_err(|e| FirestoreError::AuthError(e.to_string()))?;
        let value = token
            .token()
            .ok_or_else(|| FirestoreError::AuthError("No token available".to_string()))?
            .to_string();
        *cached = Some(token);
        Ok(Some(value))
    }
}
