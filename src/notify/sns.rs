//! SNS topic notifier

use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client as SnsClient;

use super::{Notifier, NotifyError};

/// Publishes to a single SNS topic
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: SnsClient,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: SnsClient, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Publish(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            topic_arn = %self.topic_arn,
            subject = %subject,
            message_id = output.message_id().unwrap_or_default(),
            "Notification published"
        );

        Ok(())
    }
}
