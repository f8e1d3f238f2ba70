//! Capabilities the host environment supplies to the core.
//!
//! The core never talks to a screen, a dialog or an address bar directly.
//! A front end implements these traits and hands them over at construction.

use std::sync::Arc;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Surfaces short transient messages to the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Blocking yes/no question. Resolves to `false` when the user declines.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Page-level navigation.
pub trait Navigator: Send + Sync {
    /// Site-relative path currently shown, e.g. `/`.
    fn current_path(&self) -> String;

    /// Leaves the current page. Accepts site paths and absolute URLs.
    fn navigate(&self, target: &str);
}

/// Bundle of host capabilities shared by the session cache and the orchestrator.
#[derive(Clone)]
pub struct Platform {
    pub confirmation: Arc<dyn Confirmation>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl Platform {
    pub fn new(
        confirmation: Arc<dyn Confirmation>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            confirmation,
            navigator,
            notifier,
        }
    }

    pub fn info(&self, message: &str) {
        self.notifier.notify(NotificationLevel::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.notifier.notify(NotificationLevel::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.notifier.notify(NotificationLevel::Error, message);
    }
}
