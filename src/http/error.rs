//! HTTP status mapping for [`RecipeError`].
//!
//! Not-found answers with an empty JSON object so clients can tell
//! it apart from a failure; everything else becomes a 500 with a
//! structured error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::RecipeError;
use crate::core::types::ErrorResponse;

impl RecipeError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecipeError::RecipeNotFound(_) => StatusCode::NOT_FOUND,
            RecipeError::StoreUnavailable(_)
            | RecipeError::StoreError(_)
            | RecipeError::BulkInsertFailed(_)
            | RecipeError::SeedDataError(_)
            | RecipeError::ConfigError(_)
            | RecipeError::MetricsError(_)
            | RecipeError::IoError(_)
            | RecipeError::SerdeError(_)
            | RecipeError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_not_found() {
            return (status, Json(json!({}))).into_response();
        }

        let body = Json(ErrorResponse {
            error: self.message(),
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}
