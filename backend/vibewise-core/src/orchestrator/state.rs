use crate::camera::CameraHandle;

use models::{DetectionResult, PlaylistInfo};

use std::fmt;

/// Where the capture workflow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionState {
    Idle,
    AuthChecking,
    CameraStarting,
    CameraReady,
    Detecting,
    Classifying,
    Result(DetectionResult),
    Error(String),
    /// Leaving the page. Terminal.
    Redirecting(String),
}

impl DetectionState {
    /// `Result` and `Error` are display states and behave like `Idle` here.
    pub fn accepts_start(&self) -> bool {
        matches!(
            self,
            DetectionState::Idle | DetectionState::Result(_) | DetectionState::Error(_)
        )
    }

    /// States in which a camera stream is, or is about to be, live.
    pub fn is_capture_phase(&self) -> bool {
        matches!(
            self,
            DetectionState::CameraStarting
                | DetectionState::CameraReady
                | DetectionState::Detecting
                | DetectionState::Classifying
        )
    }

    pub fn is_redirecting(&self) -> bool {
        matches!(self, DetectionState::Redirecting(_))
    }
}

impl fmt::Display for DetectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionState::Idle => write!(f, "idle"),
            DetectionState::AuthChecking => write!(f, "checking login"),
            DetectionState::CameraStarting => write!(f, "starting camera"),
            DetectionState::CameraReady => write!(f, "camera ready"),
            DetectionState::Detecting => write!(f, "capturing"),
            DetectionState::Classifying => write!(f, "analyzing mood"),
            DetectionState::Result(result) => write!(
                f,
                "result: {} {} ({})",
                result.mood_emoji(),
                result.mood_label(),
                result.confidence_display()
            ),
            DetectionState::Error(message) => write!(f, "error: {message}"),
            DetectionState::Redirecting(target) => write!(f, "redirecting to {target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    CameraReady(CameraHandle),
    Declined,
    Redirecting,
    /// Not accepted in the current state, or another check was running.
    Ignored,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectOutcome {
    Detected(DetectionResult),
    Redirecting,
    Failed { message: String },
    Ignored,
    /// The workflow moved on (e.g. stopped) before the answer arrived.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistOutcome {
    Created(PlaylistInfo),
    Redirecting,
    Failed { message: String },
    Ignored,
}
