//! Transient Notifications
//!
//! Holds the single transient message that reports mutation outcomes.
//! A notification stays visible for a fixed window and then clears
//! itself; showing a new one replaces the old and cancels its pending
//! clear, so a stale timer can never hide a newer message.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Default visibility window for a notification
pub const DEFAULT_CLEAR_AFTER: Duration = Duration::from_secs(11);

/// The transient message shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_failure: bool,
    pub visible: bool,
}

/// Owns the one live notification and its auto-clear timer
pub struct Notifier {
    state: Arc<Mutex<Notification>>,
    clear_task: Mutex<Option<JoinHandle<()>>>,
    clear_after: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_clear_after(DEFAULT_CLEAR_AFTER)
    }

    /// Override the visibility window (tests use millisecond windows)
    pub fn with_clear_after(clear_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(Notification::default())),
            clear_task: Mutex::new(None),
            clear_after,
        }
    }

    /// Show a notification, replacing any visible one and restarting
    /// the auto-clear window.
    pub async fn show(&self, message: impl Into<String>, is_failure: bool) {
        let message = message.into();

        // Cancel the pending clear before it can hide the new message
        let mut clear_task = self.clear_task.lock().await;
        if let Some(task) = clear_task.take() {
            task.abort();
        }

        {
            let mut state = self.state.lock().await;
            *state = Notification {
                message,
                is_failure,
                visible: true,
            };
        }

        let state = self.state.clone();
        let clear_after = self.clear_after;
        *clear_task = Some(tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            let mut state = state.lock().await;
            *state = Notification::default();
        }));
    }

    /// The current notification state (cleared = all defaults).
    pub async fn current(&self) -> Notification {
        self.state.lock().await.clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_show_makes_visible() {
        let notifier = Notifier::new();
        notifier.show("Added usdc.test to the token list", false).await;

        let current = notifier.current().await;
        assert!(current.visible);
        assert!(!current.is_failure);
        assert_eq!(current.message, "Added usdc.test to the token list");
    }

    #[tokio::test]
    async fn test_auto_clear_after_window() {
        let notifier = Notifier::with_clear_after(Duration::from_millis(40));
        notifier.show("hello", false).await;

        sleep(Duration::from_millis(100)).await;

        let current = notifier.current().await;
        assert!(!current.visible);
        assert!(current.message.is_empty());
        assert!(!current.is_failure);
    }

    #[tokio::test]
    async fn test_new_notification_cancels_stale_timer() {
        let notifier = Notifier::with_clear_after(Duration::from_millis(80));
        notifier.show("first", false).await;

        // Replace it mid-window; the first timer must not clear the second
        sleep(Duration::from_millis(40)).await;
        notifier.show("second", true).await;

        // Past the first notification's original window
        sleep(Duration::from_millis(60)).await;
        let current = notifier.current().await;
        assert!(current.visible);
        assert_eq!(current.message, "second");
        assert!(current.is_failure);

        // The second one's own window still applies
        sleep(Duration::from_millis(80)).await;
        assert!(!notifier.current().await.visible);
    }
}
