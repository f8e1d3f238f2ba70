use models::ReturnIntent;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info};

struct StoredIntent {
    intent: ReturnIntent,
    stored_at: Instant,
}

/// Per-tab storage for where to go after login.
///
/// Holds at most one intent. Reading it removes it, and an intent older than
/// the TTL reads as absent.
#[derive(Clone)]
pub struct ReturnIntentSlot {
    inner: Arc<Mutex<Option<StoredIntent>>>,
    ttl: Duration,
}

impl ReturnIntentSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// Stores `intent`, replacing any previous one.
    pub fn record(&self, intent: ReturnIntent) {
        debug!(
            "Recording return intent to {} (auto start: {})",
            intent.return_path(),
            intent.auto_start_capture()
        );
        *self.lock() = Some(StoredIntent {
            intent,
            stored_at: Instant::now(),
        });
    }

    /// Removes the stored intent and returns it if it has not expired.
    pub fn take(&self) -> Option<ReturnIntent> {
        let stored = self.lock().take()?;

        if stored.stored_at.elapsed() >= self.ttl {
            info!("Return intent expired, discarding");
            return None;
        }

        Some(stored.intent)
    }

    /// Whether a live intent asks for auto-start. Does not consume it.
    pub fn pending_auto_start(&self) -> bool {
        self.lock().as_ref().is_some_and(|stored| {
            stored.stored_at.elapsed() < self.ttl && stored.intent.auto_start_capture()
        })
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoredIntent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
