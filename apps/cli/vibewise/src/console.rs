//! Terminal implementations of the host capabilities the core asks for.

use crate::error::VibewiseError;

use common::ErrorLocation;

use vibewise_core::platform::{Confirmation, Navigator, NotificationLevel, NotificationSink};

use std::io::{Write, stdout};
use std::panic::Location;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::Mutex as AsyncMutex;

pub const CONFIRM_SUFFIX: &str = " [y/N] ";

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Line source shared by the command loop and confirmation prompts.
///
/// Only one reader holds the lock at a time, so a prompt raised while a
/// command is running consumes the next typed line.
pub struct ConsoleInput {
    lines: AsyncMutex<Lines<BufReader<BoxedReader>>>,
}

impl ConsoleInput {
    pub fn new(reader: BoxedReader) -> Self {
        Self {
            lines: AsyncMutex::new(BufReader::new(reader).lines()),
        }
    }

    pub fn stdin() -> Self {
        Self::new(Box::new(tokio::io::stdin()))
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn next_line(&self) -> Result<Option<String>, VibewiseError> {
        self.lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| VibewiseError::Input {
                message: format!("Failed to read console input: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// `y` or `yes`, any case. Everything else declines.
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub struct ConsoleConfirmation {
    input: Arc<ConsoleInput>,
}

impl ConsoleConfirmation {
    pub fn new(input: Arc<ConsoleInput>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmation for ConsoleConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        print!("{message}{CONFIRM_SUFFIX}");
        if let Err(e) = stdout().flush() {
            warn!("Failed to flush prompt: {e}");
        }

        match self.input.next_line().await {
            Ok(Some(line)) => parse_answer(&line),
            Ok(None) => {
                debug!("Input closed during confirmation, treating as decline");
                false
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}

pub fn format_notification(level: NotificationLevel, message: &str) -> String {
    let tag = match level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {message}")
}

pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        debug!("Notification ({level:?}): {message}");
        println!("{}", format_notification(level, message));
    }
}

/// Tracks which page the user is "on".
///
/// Site paths replace the current path. Absolute URLs leave the app, so they
/// are printed for the user to open and the current path is kept.
pub struct ConsoleNavigator {
    current: Mutex<String>,
    visited: Mutex<Vec<String>>,
}

impl ConsoleNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(initial_path.into()),
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn set_current(&self, path: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }

    pub fn last_target(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for ConsoleNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, target: &str) {
        info!("Navigating to {target}");
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.to_string());

        if target.starts_with('/') {
            self.set_current(target);
            println!("[page] {target}");
        } else {
            println!("Open this address in your browser to continue: {target}");
        }
    }
}
