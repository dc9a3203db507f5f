// AWS client construction
//
// Clients are built once per process and shared by reference across
// invocations; they hold no per-call mutable state.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sns::Client as SnsClient;
use std::sync::Arc;

use crate::config::{Config, S3Config};
use crate::notify::{DisabledNotifier, Notifier, SnsNotifier};
use crate::storage::{ObjectStore, S3ObjectStore};

/// Process-wide AWS clients
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub s3: S3Client,
    pub sns: SnsClient,
}

/// Load the shared SDK configuration, applying region and static credentials
pub async fn load_sdk_config(s3: &S3Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &s3.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let (Some(access_key), Some(secret_key)) = (&s3.access_key, &s3.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            "kasasagi-config",
        ));
    }

    loader.load().await
}

impl AwsClients {
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = load_sdk_config(&config.s3).await;
        Self::from_sdk_config(&sdk_config, &config.s3)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, s3: &S3Config) -> Self {
        let mut s3_builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if let Some(endpoint) = &s3.endpoint {
            s3_builder = s3_builder.endpoint_url(endpoint);
        }
        s3_builder = s3_builder.force_path_style(s3.force_path_style);

        Self {
            s3: S3Client::from_conf(s3_builder.build()),
            sns: SnsClient::new(sdk_config),
        }
    }

    pub fn object_store(&self) -> Arc<dyn ObjectStore> {
        Arc::new(S3ObjectStore::new(self.s3.clone()))
    }

    /// SNS notifier for the configured topic, or a disabled one when none is set
    pub fn notifier(&self, config: &Config) -> Arc<dyn Notifier> {
        match config.notification.enabled_topic() {
            Some(topic_arn) => Arc::new(SnsNotifier::new(self.sns.clone(), topic_arn)),
            None => {
                tracing::info!("No notification topic configured, publishing disabled");
                Arc::new(DisabledNotifier)
            }
        }
    }
}
