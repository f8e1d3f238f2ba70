//! Authentication snapshot as last reported by the status endpoint.

use serde::{Deserialize, Serialize};

/// Display name used when the server reports a user without a name.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// The connected user's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
}

impl Identity {
    pub fn new(display_name: Option<String>) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());
        Self { display_name }
    }
}

/// Result of the most recent authentication check.
///
/// Fields are private so an identity can never be attached to a
/// disconnected state. Replace the whole value, never patch it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthState {
    connected: bool,
    identity: Option<Identity>,
}

impl AuthState {
    pub fn authenticated(identity: Option<Identity>) -> Self {
        Self {
            connected: true,
            identity,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            connected: false,
            identity: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.display_name.as_str())
    }
}
