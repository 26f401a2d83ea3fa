//! # Error Types
//!
//! This module defines `SearchError`, the error type shared by every stage of
//! the search pipeline. Driver-level errors (`reqwest`, `turso`) are wrapped
//! here before they cross the crate boundary, so callers can classify a
//! failure without matching on third-party types.

use std::time::Duration;
use thiserror::Error;

/// The error type for the verse search pipeline.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The query text was empty or whitespace-only.
    #[error("query text must not be empty")]
    EmptyQuery,

    /// The requested result count was outside the accepted range.
    #[error("limit must be between 1 and {max}, got {requested}")]
    LimitOutOfRange { requested: u32, max: u32 },

    /// The translation code is not one of the supported sources.
    #[error("unknown translation source: '{0}'")]
    InvalidTranslation(String),

    /// The HTTP client for the embedding provider could not be built.
    #[error("failed to build embedding HTTP client: {0}")]
    HttpClientBuild(reqwest::Error),

    /// The embedding provider did not answer within the configured deadline.
    #[error("embedding request timed out after {0:?}")]
    EmbeddingTimeout(Duration),

    /// The embedding provider could not be reached at all.
    #[error("embedding provider unreachable: {0}")]
    EmbeddingUnavailable(String),

    /// The embedding provider answered with a non-success status.
    #[error("embedding provider returned an error: {0}")]
    EmbeddingFailed(String),

    /// The embedding provider answered 2xx but the body was not the
    /// expected `{"data": [{"embedding": [..]}]}` shape.
    #[error("embedding response was malformed: {0}")]
    EmbeddingMalformed(String),

    /// A database query did not complete within the configured deadline.
    #[error("database query timed out after {0:?}")]
    DatabaseTimeout(Duration),

    /// A row came back with a column type the pipeline cannot decode.
    #[error("unexpected value in result row: {0}")]
    RowDecode(String),

    /// Any other failure reported by the database driver.
    #[error("database operation failed: {0}")]
    Database(#[from] turso::Error),
}

impl SearchError {
    /// True when the failure was caused by the caller's input rather than
    /// by a dependency. The HTTP layer maps input errors to 400 and
    /// everything else into the 5xx family.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SearchError::EmptyQuery
                | SearchError::LimitOutOfRange { .. }
                | SearchError::InvalidTranslation(_)
        )
    }
}
