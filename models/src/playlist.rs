//! Playlist returned by the playlist-creation endpoint.

use serde::{Deserialize, Serialize};

const FALLBACK_GENRES_TEXT: &str = "your favorites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    pub playlist: PlaylistSummary,
    pub spotify_url: String,
    #[serde(default)]
    pub genres_used: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PlaylistInfo {
    /// One-line description shown under the playlist name.
    ///
    /// Prefers the server's message, otherwise lists the genres used.
    pub fn summary(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }

        let genres = match self.genres_used.as_deref() {
            Some(genres) if !genres.is_empty() => genres.join(", "),
            _ => FALLBACK_GENRES_TEXT.to_string(),
        };

        format!("Based on {genres}")
    }
}
