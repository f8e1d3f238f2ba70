use crate::ReturnIntent;
use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::panic::Location;

/// Builder for validated [`ReturnIntent`] values.
#[derive(Debug, Default)]
pub struct ReturnIntentBuilder {
    return_path: Option<String>,
    auto_start_capture: Option<bool>,
}

impl ReturnIntentBuilder {
    pub fn with_return_path(mut self, path: impl Into<String>) -> Self {
        self.return_path = Some(path.into());
        self
    }

    pub fn with_auto_start_capture(mut self, auto_start: bool) -> Self {
        self.auto_start_capture = Some(auto_start);
        self
    }

    /// Build the intent. Auto-start defaults to off.
    #[track_caller]
    pub fn build(self) -> Result<ReturnIntent, ModelError> {
        let return_path = self.return_path.ok_or_else(|| ModelError::Validation {
            message: String::from("Return path is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if return_path.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Return path cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Site-relative only; `//host` is protocol-relative
        if !return_path.starts_with('/') || return_path.starts_with("//") {
            return Err(ModelError::Validation {
                message: format!("Return path must be site-relative: {return_path}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(ReturnIntent {
            return_path,
            auto_start_capture: self.auto_start_capture.unwrap_or(false),
        })
    }
}
