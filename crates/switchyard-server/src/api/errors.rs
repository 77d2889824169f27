//! API error codes and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use switchyard_store::StoreError;

// ── Error code constants ────────────────────────────────────────────

/// Invalid or missing request body.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// State store read/write failure.
pub const STORE_ERROR: &str = "STORE_ERROR";

/// Error type returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body missing or malformed.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },

    /// The state store failed to load or save a document.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::Internal { .. } => INTERNAL_ERROR,
            Self::Store(_) => STORE_ERROR,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParams { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error body inside an error response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g. `INVALID_PARAMS`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Wire shape of an error response: `{ "error": { code, message } }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error payload.
    pub error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_owned(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
