pub mod csrf;
pub mod wire;

use crate::api_client::csrf::{CSRF_HEADER_NAME, CsrfSources, resolve_csrf_token};
use crate::api_client::wire::{
    DetectRequest, DetectResponse, ErrorBody, LogoutResponse, PlaylistRequest, PlaylistResponse,
    SAVE_CAPTURED_IMAGE, StatusResponse,
};
use crate::camera::CapturedFrame;
use crate::config::ServerConfig;
use crate::error::api::ApiError;

use common::{HttpStatusCode, RedactedToken};
use models::{AuthState, DetectionResult, Identity, PlaylistInfo};

use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

const STATUS_ENDPOINT: &str = "/api/spotify/status/";
const LOGOUT_ENDPOINT: &str = "/api/spotify/logout/";
const DETECT_ENDPOINT: &str = "/api/mood/detect/";
const CREATE_PLAYLIST_ENDPOINT: &str = "/api/spotify/create_playlist/";

const DETECT_FALLBACK_ERROR: &str = "Failed to detect mood";
const CREATE_PLAYLIST_FALLBACK_ERROR: &str = "Failed to create playlist";
const LOGOUT_FALLBACK_ERROR: &str = "Logout failed on server";

const _: () = assert!(!SAVE_CAPTURED_IMAGE);

/// HTTP client for the VibeWise server.
///
/// Requests carry the session cookie from a shared jar, the way a browser
/// sends same-origin credentials. Mutating calls also carry an anti-forgery
/// token and refuse to send anything when none can be resolved.
#[derive(Clone)]
pub struct VibewiseClient {
    base_url: Url,
    client: Client,
    cookie_jar: Arc<Jar>,
    csrf_meta_token: Option<RedactedToken>,
    csrf_form_token: Option<RedactedToken>,
}

impl VibewiseClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)?;
        let cookie_jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(config.request_timeout())
            .cookie_provider(Arc::clone(&cookie_jar))
            .build()?;

        let vibewise_client = Self {
            base_url,
            client,
            cookie_jar,
            csrf_meta_token: config.csrf_meta_token.as_deref().map(RedactedToken::new),
            csrf_form_token: config.csrf_form_token.as_deref().map(RedactedToken::new),
        };

        if let Some(cookie_header) = config.session_cookie.as_deref() {
            vibewise_client.add_cookies(cookie_header);
        }

        Ok(vibewise_client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Seeds the jar from a `Cookie` header value (`name=value; name2=value2`).
    pub fn add_cookies(&self, cookie_header: &str) {
        for pair in cookie_header
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            self.cookie_jar.add_cookie_str(pair, &self.base_url);
        }
    }

    /// Token for the `X-CSRFToken` header: cookie first, then page meta, then form field.
    pub fn csrf_token(&self) -> Option<RedactedToken> {
        let cookie_header = self.cookie_jar.cookies(&self.base_url);

        resolve_csrf_token(&CsrfSources {
            cookie_header: cookie_header.as_ref().and_then(|h| h.to_str().ok()),
            meta_token: self.csrf_meta_token.as_ref().map(RedactedToken::as_str),
            form_token: self.csrf_form_token.as_ref().map(RedactedToken::as_str),
        })
    }

    /// Reads the connection status.
    ///
    /// # Errors
    ///
    /// Every failure, including non-2xx responses and unreadable bodies, is
    /// reported as [`ApiError::AuthUnavailable`].
    pub async fn fetch_status(&self) -> Result<AuthState, ApiError> {
        let url = self.base_url.join(STATUS_ENDPOINT)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::auth_unavailable(format!("Status request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::auth_unavailable(format!(
                "Status endpoint returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| ApiError::auth_unavailable(format!("Unreadable status body: {e}")))?;

        if !status.connected {
            return Ok(AuthState::unauthenticated());
        }

        let display_name = status.user.and_then(|u| u.name);
        Ok(AuthState::authenticated(Some(Identity::new(display_name))))
    }

    /// Ends the server session.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingCsrfToken`] before anything is sent,
    /// [`ApiError::RemoteRejected`] when the server does not confirm.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let token = self.require_csrf_token()?;
        let url = self.base_url.join(LOGOUT_ENDPOINT)?;

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER_NAME, token.as_str())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Err(rejection(response, LOGOUT_FALLBACK_ERROR).await);
        }

        let body: LogoutResponse = response.json().await.unwrap_or_default();
        if !body.success {
            let message = ErrorBody {
                error: body.error,
                message: body.message,
            }
            .into_message()
            .unwrap_or_else(|| LOGOUT_FALLBACK_ERROR.to_string());
            return Err(ApiError::remote_rejected(status_code, message));
        }

        info!("Server session ended");
        Ok(())
    }

    /// Submits one frame for classification. The frame is consumed, and the
    /// data URI built from it is wiped once the request body is serialized.
    /// The serialized body itself is owned by reqwest and is not wiped.
    ///
    /// # Errors
    ///
    /// [`ApiError::SessionExpired`] on 401, [`ApiError::RemoteRejected`] with
    /// the server's `error` on other non-2xx statuses.
    pub async fn detect_mood(&self, frame: CapturedFrame) -> Result<DetectionResult, ApiError> {
        let token = self.require_csrf_token()?;
        let url = self.base_url.join(DETECT_ENDPOINT)?;

        debug!("Submitting {:?} for classification", frame);

        let request = {
            let image = frame.into_data_uri();
            self.client
                .post(url)
                .header(CSRF_HEADER_NAME, token.as_str())
                .json(&DetectRequest {
                    image: image.as_str(),
                    save_image: SAVE_CAPTURED_IMAGE,
                })
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(rejection(response, DETECT_FALLBACK_ERROR).await);
        }

        let detected: DetectResponse = read_json(response).await?;
        let result = DetectionResult::new(detected.mood, detected.confidence)?;

        info!(
            "Mood detected: {} ({})",
            result.mood(),
            result.confidence_display()
        );
        Ok(result)
    }

    /// Asks the server to build a playlist for `mood`, sent verbatim.
    pub async fn create_playlist(&self, mood: &str) -> Result<PlaylistInfo, ApiError> {
        let token = self.require_csrf_token()?;
        let url = self.base_url.join(CREATE_PLAYLIST_ENDPOINT)?;

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER_NAME, token.as_str())
            .json(&PlaylistRequest { mood })
            .send()
            .await?;

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Err(rejection(response, CREATE_PLAYLIST_FALLBACK_ERROR).await);
        }

        let body: PlaylistResponse = read_json(response).await?;

        match body.playlist {
            Some(playlist) => {
                info!("Playlist created: {}", playlist.name);
                Ok(PlaylistInfo {
                    playlist,
                    spotify_url: body.spotify_url.unwrap_or_default(),
                    genres_used: body.genres_used,
                    message: body.message,
                })
            }
            None => {
                let message = body
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| CREATE_PLAYLIST_FALLBACK_ERROR.to_string());
                Err(ApiError::remote_rejected(status_code, message))
            }
        }
    }

    fn require_csrf_token(&self) -> Result<RedactedToken, ApiError> {
        self.csrf_token().ok_or_else(|| {
            warn!("No CSRF token available, request not sent");
            ApiError::missing_csrf_token()
        })
    }
}

/// Reads the whole body, then decodes it. A body that is not the expected
/// JSON is [`ApiError::Json`], a broken connection is [`ApiError::Http`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Maps a non-2xx response to an error. 401 always means the session expired.
async fn rejection(response: Response, fallback: &str) -> ApiError {
    let status_code = HttpStatusCode(response.status().as_u16());

    if status_code.is_unauthorized() {
        warn!("Server answered 401, session expired");
        return ApiError::session_expired();
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| fallback.to_string());

    warn!("Server rejected request: HTTP {} - {}", status_code, message);
    ApiError::remote_rejected(status_code.0, message)
}
