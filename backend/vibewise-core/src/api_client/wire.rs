//! Request and response bodies exchanged with the VibeWise server.

use models::PlaylistSummary;

use serde::{Deserialize, Serialize};

/// Never store the submitted frame server-side. Checked at compile time
/// where the detection request is built.
pub const SAVE_CAPTURED_IMAGE: bool = false;

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub user: Option<StatusUser>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUser {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct DetectRequest<'a> {
    pub image: &'a str,
    pub save_image: bool,
}

#[derive(Debug, Deserialize)]
pub struct DetectResponse {
    pub mood: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct PlaylistRequest<'a> {
    pub mood: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default)]
    pub playlist: Option<PlaylistSummary>,
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub genres_used: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Shape of an error body on any non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// First non-empty of `error`, then `message`.
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
    }
}
