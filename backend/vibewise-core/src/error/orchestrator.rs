use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OrchestratorError {
    #[error("Actor Stopped Error: {message} {location}")]
    ActorStopped {
        message: String,
        location: ErrorLocation,
    },
}

impl OrchestratorError {
    #[track_caller]
    pub fn actor_stopped(message: impl Into<String>) -> Self {
        OrchestratorError::ActorStopped {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
