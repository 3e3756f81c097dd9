//! Firestore REST client
//!
//! Thin wrapper over the `documents:runQuery` endpoint of the Firestore v1 REST API.
//! The scheduling core only ever reads, so this is the single call it needs.

use crate::auth::TokenProvider;
use crate::models::{Document, RunQueryResponseItem};
use bienestar_common::{external_service_error, BienestarError, StoreError};
use bienestar_config::FirestoreConfig;
use reqwest::{header, Client};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when talking to Firestore
#[derive(Error, Debug)]
pub enum FirestoreError {
    /// Error during authentication with Google
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to the Firestore API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the Firestore API
    #[error("Firestore API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// A document did not have the expected shape
    #[error("Malformed document {name}: {reason}")]
    DecodeError { name: String, reason: String },
}

impl From<FirestoreError> for BienestarError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::ConfigError(msg) => BienestarError::ConfigError(msg),
            FirestoreError::AuthError(msg) => BienestarError::AuthError(msg),
            other => external_service_error("Firestore", other),
        }
    }
}

impl From<FirestoreError> for StoreError {
    fn from(err: FirestoreError) -> Self {
        let transient = match &err {
            FirestoreError::RequestError(_) | FirestoreError::AuthError(_) => true,
            FirestoreError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        };
        if transient {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Backend(Box::new(err))
        }
    }
}

/// Client for the Firestore REST API
pub struct FirestoreClient {
    client: Client,
    tokens: TokenProvider,
    documents_url: String,
}

impl FirestoreClient {
    /// Creates a client for the configured project and database.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::ConfigError` when `project_id` is missing.
    pub fn new(config: &FirestoreConfig, tokens: TokenProvider) -> Result<Self, FirestoreError> {
        let project_id = config.project_id.as_deref().ok_or_else(|| {
            FirestoreError::ConfigError("Missing project_id in FirestoreConfig".to_string())
        })?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.base_url.trim_end_matches('/'),
            project_id,
            config.database_id
        );

        Ok(Self {
            client: Client::new(),
            tokens,
            documents_url,
        })
    }

    /// Creates a client and loads the service account key named in the config.
    pub async fn from_config(config: &FirestoreConfig) -> Result<Self, FirestoreError> {
        let tokens = TokenProvider::from_config(config).await?;
        Self::new(config, tokens)
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    /// Runs a structured query and returns the matching documents.
    ///
    /// `query` is the full request body, i.e. `{"structuredQuery": {...}}`.
    pub async fn run_query(&self, query: &serde_json::Value) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_url);

        let mut request = self.client.post(&url).json(query);
        if let Some(token) = self.tokens.bearer().await? {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(FirestoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let items: Vec<RunQueryResponseItem> = response.json().await?;
        let documents: Vec<Document> = items.into_iter().filter_map(|item| item.document).collect();
        debug!("runQuery returned {} documents", documents.len());
        Ok(documents)
    }
}
