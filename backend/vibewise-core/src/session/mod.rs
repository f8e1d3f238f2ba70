//! Cached authentication state and the login/logout flows built on it.
//!
//! [`SessionCache`] is the only writer of the cached [`AuthState`]. Status
//! checks are single-flight: while one is outstanding, further callers get the
//! previous answer instead of issuing a second request.
//!
//! Failures never escape as errors from the status path. A status endpoint
//! that cannot be read means "not logged in".

pub(crate) mod in_flight;
pub mod intent_slot;
pub mod oauth;

pub use intent_slot::ReturnIntentSlot;

use crate::api_client::VibewiseClient;
use crate::config::{ClientConfig, OAuthConfig, SessionConfig};
use crate::error::api::{ApiError, SESSION_EXPIRED_MESSAGE};
use crate::platform::Platform;
use crate::session::in_flight::InFlightGuard;
use crate::session::oauth::build_authorize_url;
use crate::{LOGIN_PATH, ROOT_PATH};

use models::{AuthState, ReturnIntent, ReturnIntentBuilder};

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::{debug, error, info, warn};
use tokio::sync::RwLock;
use url::Url;

pub const LOGIN_REQUIRED_PROMPT: &str = "🎵 Spotify Login Required\n\n\
    You need to connect with Spotify to use VibeWise mood detection.\n\n\
    Click OK to login now.";

pub const LOGOUT_PROMPT: &str = "Are you sure you want to logout?\n\n\
    You can login with a different Spotify account after logout.";

/// Result of a gated authentication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGate {
    Authenticated,
    /// User accepted the login prompt; navigation to the login page has started.
    Redirecting,
    Declined,
    /// Another gated check is running. No prompt was shown.
    InProgress,
}

impl AuthGate {
    pub fn is_authenticated(self) -> bool {
        self == AuthGate::Authenticated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    Cancelled,
    LoggedOut,
}

#[derive(Clone)]
pub struct SessionCache {
    client: VibewiseClient,
    state: Arc<RwLock<AuthState>>,
    check_in_flight: Arc<AtomicBool>,
    gate_in_flight: Arc<AtomicBool>,
    intent_slot: ReturnIntentSlot,
    platform: Platform,
    session_config: SessionConfig,
    oauth_config: OAuthConfig,
}

impl SessionCache {
    pub fn new(client: VibewiseClient, platform: Platform, config: &ClientConfig) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(AuthState::unauthenticated())),
            check_in_flight: Arc::new(AtomicBool::new(false)),
            gate_in_flight: Arc::new(AtomicBool::new(false)),
            intent_slot: ReturnIntentSlot::new(config.session.return_intent_ttl()),
            platform,
            session_config: config.session.clone(),
            oauth_config: config.oauth.clone(),
        }
    }

    pub fn client(&self) -> &VibewiseClient {
        &self.client
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    pub fn intent_slot(&self) -> &ReturnIntentSlot {
        &self.intent_slot
    }

    /// Re-reads the status from the server and caches it.
    ///
    /// Coalesces: while a refresh is outstanding this returns the cached
    /// state without touching the network.
    pub async fn refresh(&self) -> AuthState {
        let Some(_in_flight) = InFlightGuard::try_acquire(&self.check_in_flight) else {
            debug!("Status check already in flight, returning cached state");
            return self.current().await;
        };

        let next = match self.client.fetch_status().await {
            Ok(state) => state,
            Err(e) => {
                warn!("Treating user as logged out ({}): {}", e.error_category(), e);
                AuthState::unauthenticated()
            }
        };

        debug!(
            "Auth state refreshed: connected={}, user={:?}",
            next.is_connected(),
            next.display_name()
        );

        *self.state.write().await = next.clone();
        next
    }

    /// Cached state, no I/O.
    pub async fn current(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Gate for protected actions. Prompts for login when the user is not
    /// connected and, if accepted, records where to come back to.
    pub async fn require_authenticated(&self, auto_start_capture: bool) -> AuthGate {
        let Some(_in_flight) = InFlightGuard::try_acquire(&self.gate_in_flight) else {
            debug!("Auth gate already running, ignoring");
            return AuthGate::InProgress;
        };

        if self.refresh().await.is_connected() {
            return AuthGate::Authenticated;
        }

        info!("User not authenticated, prompting for login");

        if !self.platform.confirmation.confirm(LOGIN_REQUIRED_PROMPT).await {
            info!("Login prompt declined");
            return AuthGate::Declined;
        }

        let return_path = self.platform.navigator.current_path();
        self.record_return_intent(return_path, auto_start_capture);
        self.platform.navigator.navigate(LOGIN_PATH);

        AuthGate::Redirecting
    }

    /// Re-queries the status without prompting.
    pub async fn is_session_valid(&self) -> bool {
        self.refresh().await.is_connected()
    }

    /// Marks the session as gone, tells the user, and moves to the login page
    /// after the configured delay.
    pub async fn signal_session_expired(&self) {
        *self.state.write().await = AuthState::unauthenticated();
        self.platform.error(SESSION_EXPIRED_MESSAGE);

        tokio::time::sleep(self.session_config.redirect_delay()).await;
        self.platform.navigator.navigate(LOGIN_PATH);
    }

    /// [`is_session_valid`](Self::is_session_valid) followed by
    /// [`signal_session_expired`](Self::signal_session_expired) when it is not.
    ///
    /// Callers holding resources should use the two halves and release in between.
    pub async fn quick_check(&self) -> bool {
        if self.is_session_valid().await {
            return true;
        }

        self.signal_session_expired().await;
        false
    }

    /// Asks for confirmation, then ends the session.
    pub async fn logout(&self) -> Result<LogoutOutcome, ApiError> {
        if !self.platform.confirmation.confirm(LOGOUT_PROMPT).await {
            info!("Logout cancelled");
            return Ok(LogoutOutcome::Cancelled);
        }

        self.end_session().await
    }

    /// Logs out on the server without asking. On success clears every piece
    /// of per-tab state and returns to the site root.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingCsrfToken`] without any request being sent, or the
    /// server's rejection. Both are also shown to the user.
    pub async fn end_session(&self) -> Result<LogoutOutcome, ApiError> {
        if let Err(e) = self.client.logout().await {
            error!("Logout failed ({}): {}", e.error_category(), e);
            self.platform
                .error(&format!("Failed to logout: {}", e.user_message()));
            return Err(e);
        }

        *self.state.write().await = AuthState::unauthenticated();
        self.intent_slot.clear();
        self.platform.navigator.navigate(ROOT_PATH);

        Ok(LogoutOutcome::LoggedOut)
    }

    /// Sends the user to the identity provider. Auto-start is requested when
    /// leaving from the capture page, and an auto-start already requested by
    /// the auth gate is kept.
    pub fn begin_login(&self) -> Result<Url, ApiError> {
        let authorize_url = build_authorize_url(&self.oauth_config)?;

        let return_path = self.platform.navigator.current_path();
        let auto_start = return_path == ROOT_PATH || self.intent_slot.pending_auto_start();
        self.record_return_intent(return_path, auto_start);

        info!("Redirecting to identity provider");
        self.platform.navigator.navigate(authorize_url.as_str());

        Ok(authorize_url)
    }

    /// Takes the stored intent once back on the capture page, if it asks for
    /// auto-start. Intents read elsewhere stay stored.
    pub fn consume_return_intent(&self) -> Option<ReturnIntent> {
        if self.platform.navigator.current_path() != ROOT_PATH {
            return None;
        }

        self.intent_slot
            .take()
            .filter(ReturnIntent::auto_start_capture)
    }

    fn record_return_intent(&self, return_path: String, auto_start_capture: bool) {
        let built = ReturnIntentBuilder::default()
            .with_return_path(return_path)
            .with_auto_start_capture(auto_start_capture)
            .build();

        match built {
            Ok(intent) => self.intent_slot.record(intent),
            Err(e) => warn!("Return intent not recorded: {}", e),
        }
    }
}
