//! Outcome notifications
//!
//! Publishing is diagnostic only. `publish_best_effort` is the single
//! call site used by the dispatcher: it logs a failed publish and never
//! returns the error, so a broken sink cannot change a record's outcome.

pub mod recording;
pub mod sns;

use async_trait::async_trait;
use thiserror::Error;

pub use recording::RecordingNotifier;
pub use sns::SnsNotifier;

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Failed to publish notification: {0}")]
    Publish(String),
}

/// A sink that accepts (subject, message) notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError>;

    /// False when publishing is switched off by configuration
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Notifier used when no topic is configured; drops every message
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn publish(&self, subject: &str, _message: &str) -> Result<(), NotifyError> {
        tracing::debug!(subject = %subject, "Notifications disabled, dropping message");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Publish and swallow any failure after logging it
pub async fn publish_best_effort(notifier: &dyn Notifier, subject: &str, message: &str) {
    if let Err(e) = notifier.publish(subject, message).await {
        tracing::warn!(
            subject = %subject,
            error = %e,
            "Notification publish failed"
        );
    }
}
