//! In-memory notifier that records what was published

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{Notifier, NotifyError};

/// A published (subject, message) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

/// Notifier that keeps every message in memory
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<RwLock<Vec<Notification>>>,
    failed_attempts: Arc<RwLock<usize>>,
    simulate_failure: Arc<RwLock<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every publish fail
    pub fn set_fail(&self, enabled: bool) {
        *self.simulate_failure.write() = enabled;
    }

    pub fn messages(&self) -> Vec<Notification> {
        self.messages.read().clone()
    }

    /// Messages published with `subject`
    pub fn with_subject(&self, subject: &str) -> Vec<Notification> {
        self.messages
            .read()
            .iter()
            .filter(|n| n.subject == subject)
            .cloned()
            .collect()
    }

    pub fn failed_attempts(&self) -> usize {
        *self.failed_attempts.read()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        if *self.simulate_failure.read() {
            *self.failed_attempts.write() += 1;
            return Err(NotifyError::Publish("Simulated sink failure".to_string()));
        }

        self.messages.write().push(Notification {
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
