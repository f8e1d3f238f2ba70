//! Error types for camera acquisition and frame capture.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

const CAMERA_ACCESS_PREFIX: &str = "Failed to access camera.";

#[derive(Debug, ThisError)]
pub enum CameraError {
    /// The user declined the permission prompt.
    #[error("Permission Denied Error: camera access was refused {location}")]
    PermissionDenied { location: ErrorLocation },

    #[error("Device Not Found Error: no camera available {location}")]
    DeviceNotFound { location: ErrorLocation },

    #[error("Device Error: {message} {location}")]
    Device {
        message: String,
        location: ErrorLocation,
    },

    /// Frame requested before the stream reported any dimensions.
    #[error("Capture Unready Error: {message} {location}")]
    CaptureUnready {
        message: String,
        location: ErrorLocation,
    },

    #[error("Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },
}

impl CameraError {
    #[track_caller]
    pub fn permission_denied() -> Self {
        CameraError::PermissionDenied {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn device_not_found() -> Self {
        CameraError::DeviceNotFound {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn device(message: impl Into<String>) -> Self {
        CameraError::Device {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn capture_unready(message: impl Into<String>) -> Self {
        CameraError::CaptureUnready {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn encode(message: impl Into<String>) -> Self {
        CameraError::Encode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_category(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied { .. } => "permission_denied",
            CameraError::DeviceNotFound { .. } => "device_not_found",
            CameraError::Device { .. } => "device",
            CameraError::CaptureUnready { .. } => "capture_unready",
            CameraError::Encode { .. } => "encode",
        }
    }

    /// Text shown to the user in a notification. Each acquisition failure kind
    /// gets its own wording.
    pub fn user_message(&self) -> String {
        match self {
            CameraError::PermissionDenied { .. } => {
                format!("{CAMERA_ACCESS_PREFIX} Please allow camera access in your browser.")
            }
            CameraError::DeviceNotFound { .. } => {
                format!("{CAMERA_ACCESS_PREFIX} No camera found on your device.")
            }
            CameraError::Device { message, .. } => format!("{CAMERA_ACCESS_PREFIX} {message}"),
            CameraError::CaptureUnready { .. } => {
                String::from("Camera is not ready yet. Please wait a moment and try again.")
            }
            CameraError::Encode { .. } => String::from("Failed to capture image"),
        }
    }
}
