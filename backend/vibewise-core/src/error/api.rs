//! Error types for calls to the VibeWise HTTP API.
//!
//! - HTTP status codes stored directly (not parsed from strings)
//! - `401` is its own variant so callers can release resources before redirecting
//! - All errors include ErrorLocation for debugging

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
pub const MISSING_CSRF_TOKEN_MESSAGE: &str = "CSRF token not found. Please refresh and try again.";

#[derive(Debug, ThisError)]
pub enum ApiError {
    /// The status endpoint could not be read. Callers treat this as logged out.
    #[error("Auth Unavailable Error: {message} {location}")]
    AuthUnavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Session Expired Error: {message} {location}")]
    SessionExpired {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote Rejected Error: HTTP {status_code} - {message} {location}")]
    RemoteRejected {
        status_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    /// Raised before any bytes are sent.
    #[error("Missing CSRF Token Error: {message} {location}")]
    MissingCsrfToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Response Error: {message} {location}")]
    InvalidResponse {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn auth_unavailable(message: impl Into<String>) -> Self {
        ApiError::AuthUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn session_expired() -> Self {
        ApiError::SessionExpired {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn remote_rejected(status_code: u16, message: impl Into<String>) -> Self {
        ApiError::RemoteRejected {
            status_code: HttpStatusCode(status_code),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_csrf_token() -> Self {
        ApiError::MissingCsrfToken {
            message: MISSING_CSRF_TOKEN_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ApiError::InvalidResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::RemoteRejected { status_code, .. } => Some(status_code.0),
            ApiError::SessionExpired { .. } => Some(HttpStatusCode::UNAUTHORIZED.0),
            _ => None,
        }
    }

    /// Get error category for logging.
    pub fn error_category(&self) -> &'static str {
        match self {
            ApiError::AuthUnavailable { .. } => "auth_unavailable",
            ApiError::SessionExpired { .. } => "session_expired",
            ApiError::RemoteRejected { status_code, .. } if status_code.is_server_error() => {
                "server_error"
            }
            ApiError::RemoteRejected { .. } => "client_error",
            ApiError::MissingCsrfToken { .. } => "missing_csrf_token",
            ApiError::Http { is_timeout: true, .. } => "timeout",
            ApiError::Http { is_connection: true, .. } => "connection",
            ApiError::Http { .. } => "network",
            ApiError::Json { .. } => "json",
            ApiError::UrlParse { .. } => "url_parse",
            ApiError::InvalidResponse { .. } => "invalid_response",
        }
    }

    /// Text shown to the user in a notification, without location details.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::SessionExpired { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::MissingCsrfToken { .. } => MISSING_CSRF_TOKEN_MESSAGE.to_string(),
            ApiError::RemoteRejected { message, .. } => message.clone(),
            ApiError::Http {
                is_timeout: true, ..
            } => String::from("The server took too long to respond."),
            ApiError::Http { .. } => String::from("Could not reach the server."),
            ApiError::AuthUnavailable { message, .. }
            | ApiError::Json { message, .. }
            | ApiError::UrlParse { message, .. }
            | ApiError::InvalidResponse { message, .. } => message.clone(),
        }
    }
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // Check for specific error types BEFORE converting to string
        ApiError::Http {
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<models::ModelError> for ApiError {
    #[track_caller]
    fn from(error: models::ModelError) -> Self {
        ApiError::invalid_response(error.to_string())
    }
}
