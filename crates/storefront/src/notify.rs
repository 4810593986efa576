//! User-facing notifications ("toasts").
//!
//! Stores never notify; the helpers in [`crate::actions`] pair a store call
//! with the notification a shopper expects to see.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use axum::http::HeaderValue;
use serde::Serialize;

/// How long a toast stays on screen unless overridden.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Response header carrying the latest notification for htmx clients.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// A short message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    /// Display time in milliseconds.
    #[serde(rename = "duration", serialize_with = "as_millis")]
    pub duration: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl Notification {
    /// A notification with the default duration.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration: DEFAULT_DURATION,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Fire-and-forget sink for notifications.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the log. Used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            title = %notification.title,
            description = %notification.description,
            "Notification"
        );
    }
}

/// Collects notifications raised while handling one request.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Notification>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything queued so far, oldest first.
    #[must_use]
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// The most recent notification as an `HX-Trigger` value:
    /// `{"toast": {"title": ..., "description": ..., "duration": ...}}`.
    ///
    /// Empties the queue.
    #[must_use]
    pub fn hx_trigger(&self) -> Option<HeaderValue> {
        let latest = self.take().pop()?;
        let payload = serde_json::json!({ "toast": latest });
        match HeaderValue::from_str(&payload.to_string()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Notification is not a valid header value");
                None
            }
        }
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration() {
        let notification = Notification::new("Added to cart", "Lamp has been added to your cart");
        assert_eq!(notification.duration, Duration::from_millis(2000));

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["duration"], 2000);
        assert_eq!(json["title"], "Added to cart");
    }

    #[test]
    fn test_queue_keeps_order() {
        let queue = ToastQueue::new();
        queue.notify(Notification::new("a", ""));
        queue.notify(Notification::new("b", ""));

        let titles: Vec<String> = queue.take().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["a", "b"]);
        assert!(queue.take().is_empty());
    }

    #[test]
    fn test_hx_trigger_uses_latest_notification() {
        let queue = ToastQueue::new();
        assert!(queue.hx_trigger().is_none());

        queue.notify(Notification::new("first", ""));
        queue.notify(
            Notification::new("Cart cleared", "All items have been removed from your cart")
                .with_duration(Duration::from_secs(3)),
        );

        let header = queue.hx_trigger().unwrap();
        let json: serde_json::Value = serde_json::from_str(header.to_str().unwrap()).unwrap();
        assert_eq!(json["toast"]["title"], "Cart cleared");
        assert_eq!(json["toast"]["duration"], 3000);
        assert!(queue.take().is_empty());
    }
}
