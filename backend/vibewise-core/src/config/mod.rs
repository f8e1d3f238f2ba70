use crate::DEFAULT_SERVER_BASE_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const SPOTIFY_CLIENT_ID: &str = "f99dc779642f4540b550a3217ea7a4a6";
const SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8000/callback/";
const SPOTIFY_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
];

// ============================================
// CONFIG STRUCTS
// ============================================

/// Debug output masks the CSRF tokens and the session cookie.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Token rendered into the page's `csrf-token` meta tag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_meta_token: Option<String>,
    /// Token from the hidden `csrfmiddlewaretoken` form field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_form_token: Option<String>,
    /// Raw `Cookie` header value seeded into the cookie jar at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            csrf_meta_token: None,
            csrf_form_token: None,
            session_cookie: None,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "[REDACTED]");

        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("csrf_meta_token", &mask(&self.csrf_meta_token))
            .field("csrf_form_token", &mask(&self.csrf_form_token))
            .field("session_cookie", &mask(&self.session_cookie))
            .finish()
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,
    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,
    #[serde(default = "default_facing_mode")]
    pub facing_mode: String,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            facing_mode: default_facing_mode(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pause between the "session expired" notice and the login redirect.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    /// Pause before auto-starting the camera after returning from login.
    #[serde(default = "default_auto_start_delay_ms")]
    pub auto_start_delay_ms: u64,
    #[serde(default = "default_return_intent_ttl_secs")]
    pub return_intent_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay_ms(),
            auto_start_delay_ms: default_auto_start_delay_ms(),
            return_intent_ttl_secs: default_return_intent_ttl_secs(),
        }
    }
}

impl SessionConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_start_delay_ms)
    }

    pub fn return_intent_ttl(&self) -> Duration {
        Duration::from_secs(self.return_intent_ttl_secs)
    }
}

/// External identity provider settings used to build the authorize redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_show_dialog")]
    pub show_dialog: bool,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorize_url: default_authorize_url(),
            client_id: default_client_id(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            show_dialog: default_show_dialog(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub oauth: OAuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            camera: CameraConfig::default(),
            session: SessionConfig::default(),
            oauth: OAuthConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_SERVER_BASE_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_ideal_width() -> u32 {
    640
}
fn default_ideal_height() -> u32 {
    480
}
fn default_facing_mode() -> String {
    "user".to_string()
}
fn default_jpeg_quality() -> u8 {
    80
}
fn default_redirect_delay_ms() -> u64 {
    1500
}
fn default_auto_start_delay_ms() -> u64 {
    1000
}
fn default_return_intent_ttl_secs() -> u64 {
    300
}
fn default_authorize_url() -> String {
    SPOTIFY_AUTHORIZE_URL.to_string()
}
fn default_client_id() -> String {
    SPOTIFY_CLIENT_ID.to_string()
}
fn default_redirect_uri() -> String {
    SPOTIFY_REDIRECT_URI.to_string()
}
fn default_scopes() -> Vec<String> {
    SPOTIFY_SCOPES.iter().map(|s| s.to_string()).collect()
}
fn default_show_dialog() -> bool {
    true
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// Uses temp file + rename so a crash never leaves a half-written file.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(validation_error(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        check_http_url("server.base_url", &self.server.base_url)?;

        if self.server.request_timeout_secs == 0 {
            return Err(validation_error(
                "server.request_timeout_secs must be greater than 0",
            ));
        }

        if self.camera.ideal_width == 0 || self.camera.ideal_height == 0 {
            return Err(validation_error(format!(
                "Invalid camera resolution: {}x{}",
                self.camera.ideal_width, self.camera.ideal_height
            )));
        }

        if !(1..=100).contains(&self.camera.jpeg_quality) {
            return Err(validation_error(format!(
                "Invalid JPEG quality: {} (must be 1-100)",
                self.camera.jpeg_quality
            )));
        }

        if self.session.return_intent_ttl_secs == 0 {
            return Err(validation_error(
                "session.return_intent_ttl_secs must be greater than 0",
            ));
        }

        check_http_url("oauth.authorize_url", &self.oauth.authorize_url)?;
        check_http_url("oauth.redirect_uri", &self.oauth.redirect_uri)?;

        if self.oauth.client_id.trim().is_empty() {
            return Err(validation_error("oauth.client_id cannot be empty"));
        }

        Ok(())
    }
}

#[track_caller]
fn validation_error(reason: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: reason.into(),
    }
}

#[track_caller]
fn check_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(validation_error(format!("{field} cannot be empty string")));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(validation_error(format!("Invalid URL format for {field}: {url}")));
    }

    Ok(())
}
