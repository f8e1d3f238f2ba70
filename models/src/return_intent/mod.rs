//! Where to resume after an external login redirect.

pub mod builder;

use serde::{Deserialize, Serialize};

/// Cross-navigation intent. Short-lived and consumed exactly once.
///
/// Serialized field names match the keys the web client keeps in tab storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnIntent {
    #[serde(rename = "returnTo")]
    pub(crate) return_path: String,
    #[serde(rename = "autoStartCamera")]
    pub(crate) auto_start_capture: bool,
}

impl ReturnIntent {
    pub fn return_path(&self) -> &str {
        &self.return_path
    }

    pub fn auto_start_capture(&self) -> bool {
        self.auto_start_capture
    }
}
