//! # HTTP Error Mapping
//!
//! Converts pipeline and handler errors into HTTP responses. The contract
//! is strict: every error response is a complete JSON object of the shape
//! `{"error": "..."}` with a status that tells the caller whose fault it
//! was. Input problems are 4xx; a slow dependency is 504; an unreachable or
//! misbehaving dependency is 502; everything else is 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use berea::SearchError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the search pipeline.
    Search(SearchError),
    /// Request parameters that fail before reaching the pipeline.
    BadRequest(String),
    /// A lookup for a specific resource that does not exist.
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::Search(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Search(err) => {
                // Log the original error for debugging purposes.
                error!("SearchError: {err:?}");
                let status = if err.is_input_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    match &err {
                        SearchError::EmbeddingTimeout(_) | SearchError::DatabaseTimeout(_) => {
                            StatusCode::GATEWAY_TIMEOUT
                        }
                        SearchError::EmbeddingUnavailable(_)
                        | SearchError::EmbeddingFailed(_)
                        | SearchError::EmbeddingMalformed(_) => StatusCode::BAD_GATEWAY,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    }
                };
                (status, err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
