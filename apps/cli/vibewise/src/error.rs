use common::ErrorLocation;

use vibewise_core::error::{ApiError, ConfigError, OrchestratorError};

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the terminal front end.
///
/// Core errors are flattened to their display text so the whole enum stays
/// serializable for structured logs.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum VibewiseError {
    /// Error from this App
    #[error("Vibewise Error: {message} {location}")]
    Vibewise {
        message: String,
        location: ErrorLocation,
    },

    /// Error from vibewise-core (api client, session, orchestrator)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Config directory could not be read, parsed or written
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Console input could not be read
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    /// Line typed at the prompt is not a known command
    #[error("Unknown Command Error: {message} {location}")]
    UnknownCommand {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for VibewiseError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        VibewiseError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ApiError> for VibewiseError {
    #[track_caller]
    fn from(error: ApiError) -> Self {
        VibewiseError::Core {
            message: error.user_message(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<OrchestratorError> for VibewiseError {
    #[track_caller]
    fn from(error: OrchestratorError) -> Self {
        VibewiseError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
