use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// Gemini client failure
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    /// Request handling failure
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Server startup or runtime failure
    #[error("Internal error: {message}")]
    Internal {
        /// What failed
        message: String,
    },
}

/// Gemini API errors
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Non-2xx response
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Upstream error message, or the raw body
        message: String,
    },

    /// Body could not be decoded
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Decoding error
        message: String,
    },

    /// No text in the reply (blocked, no candidates, ...)
    #[error("Empty response from Gemini: {reason}")]
    EmptyResponse {
        /// Why the reply carried no text
        reason: String,
    },

    /// The call exceeded the configured timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Neither text nor file was sent
    #[error("No message or file provided")]
    MissingInput,

    /// Malformed body
    #[error("Bad request: {message}")]
    BadRequest {
        /// What could not be read
        message: String,
    },

    /// Body or upload over the configured limit
    #[error("Upload too large (max: {max} bytes)")]
    PayloadTooLarge {
        /// Configured upload limit
        max: usize,
    },

    /// Upload type the model is not sent
    #[error("Unsupported file type: {content_type} (only PDF, image or plain text files are supported)")]
    UnsupportedMediaType {
        /// Detected MIME type
        content_type: String,
    },

    /// Gemini failed or returned nothing usable
    #[error("Upstream generation failed: {message}")]
    Upstream {
        /// Underlying error
        message: String,
    },

    /// Gemini timed out
    #[error("Upstream generation timed out after {timeout_ms}ms")]
    UpstreamTimeout {
        /// Configured timeout
        timeout_ms: u64,
    },
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable code, see [`ApiError::error_code`]
    pub error_code: &'static str,
    /// Human-readable message
    pub detail: String,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingInput => "MISSING_INPUT",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ApiError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::UpstreamTimeout { .. } => "UPSTREAM_TIMEOUT",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_code: self.error_code(),
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Timeout { timeout_ms } => ApiError::UpstreamTimeout { timeout_ms },
            other => ApiError::Upstream {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Result type alias for request handling
pub type ApiResult<T> = Result<T, ApiError>;
