//! Error types and error handling for the recipe catalog.
//!
//! This module defines the error types used by both the API server
//! and the loader. HTTP status mapping lives in the `http` adapter.

use thiserror::Error;

/// Result type alias for recipe catalog operations
pub type Result<T> = std::result::Result<T, RecipeError>;

/// Main error type for the recipe catalog
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Bulk insert failed: {0}")]
    BulkInsertFailed(String),

    #[error("Invalid seed data: {0}")]
    SeedDataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RecipeError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecipeError::RecipeNotFound(_))
    }

    /// Check if this error came from establishing the store connection
    ///
    /// Only these are worth retrying at startup.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, RecipeError::StoreUnavailable(_))
    }
}
