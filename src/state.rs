//! Application state management.
//!
//! This module defines the shared application state that is accessible
//! from all request handlers via Axum's State extractor. All of it is
//! immutable after startup; the only shared mutable resource is the
//! filesystem itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn handler(State(state): State<AppState>) -> impl IntoResponse {
//!     let names = state.store(AssetKind::Image).list().await?;
//!     // ...
//! }
//! ```

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::AssetKind;
use crate::services::{AssetStore, StorageService};
use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state
///
/// This struct holds all shared resources that handlers need access to.
/// It's cheap to clone and cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Storage service for file operations
    pub storage: Arc<StorageService>,

    /// The origin allowed by CORS, parsed once at startup
    pub cors_origin: HeaderValue,

    /// Cache-Control value for statically served files
    pub cache_control: HeaderValue,

    /// Time the state was created
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new application state
    ///
    /// # Errors
    /// Returns error if the storage directories cannot be created or the
    /// CORS origin is not a valid header value
    pub async fn new(config: Config) -> Result<Self> {
        let storage = StorageService::new(&config.storage).await?;

        let cors_origin = HeaderValue::from_str(&config.server.cors_origin).map_err(|e| {
            AppError::config(format!(
                "Invalid cors_origin {:?}: {}",
                config.server.cors_origin, e
            ))
        })?;

        let cache_control = HeaderValue::try_from(format!(
            "public, max-age={}",
            config.server.cache_max_age
        ))
        .map_err(|e| AppError::config(format!("Invalid cache_max_age: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            cors_origin,
            cache_control,
            started_at: Utc::now(),
        })
    }

    /// Store for the given asset kind
    pub fn store(&self, kind: AssetKind) -> &AssetStore {
        self.storage.store(kind)
    }

    /// Get the maximum request body size
    pub fn max_upload_size(&self) -> usize {
        self.config.server.max_upload_size
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"<Config>")
            .field("storage", &self.storage)
            .field("cors_origin", &self.cors_origin)
            .field("cache_control", &self.cache_control)
            .field("started_at", &self.started_at)
            .finish()
    }
}
