// Event dispatcher - per-record isolation over a batch of storage events
//
// Every record ends in exactly one RecordOutcome. Errors never leave the
// record that raised them: the loop always moves on to the next record.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::constants::{SUBJECT_FAILED, SUBJECT_PROCESSED, UNKNOWN_KEY};
use crate::error::ProcessingError;
use crate::event::{decode_key, S3Event, S3EventRecord, SourceObjectRef};
use crate::image_optimizer::is_variant_key;
use crate::notify::{publish_best_effort, Notifier};
use crate::pipeline::{UploadedVariant, VariantPipeline, VariantRenderer};
use crate::storage::ObjectStore;

/// Final state of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Processed {
        bucket: String,
        key: String,
        variants: Vec<UploadedVariant>,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        key: String,
        kind: &'static str,
        error: String,
    },
    Skipped {
        bucket: String,
        key: String,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn key(&self) -> &str {
        match self {
            RecordOutcome::Processed { key, .. }
            | RecordOutcome::Failed { key, .. }
            | RecordOutcome::Skipped { key, .. } => key,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, RecordOutcome::Processed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecordOutcome::Failed { .. })
    }
}

/// Summary of one batch, returned as the invocation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    fn push(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Processed { .. } => self.processed += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
            RecordOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Runs the variant pipeline for each record of an event and reports outcomes
pub struct EventDispatcher {
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    pipeline: VariantPipeline,
    destination_bucket: String,
}

impl EventDispatcher {
    pub fn new(config: &Config, store: Arc<dyn ObjectStore>, notifier: Arc<dyn Notifier>) -> Self {
        let renderer = VariantRenderer::new(config.limits);
        Self::with_renderer(config, store, notifier, renderer)
    }

    pub fn with_renderer(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        renderer: VariantRenderer,
    ) -> Self {
        Self {
            pipeline: VariantPipeline::new(store.clone(), renderer),
            store,
            notifier,
            destination_bucket: config.destination_bucket.clone(),
        }
    }

    /// Process every record of `event` in order
    pub async fn dispatch(&self, event: &S3Event) -> BatchReport {
        let mut report = BatchReport::default();

        for record in &event.records {
            let outcome = self.handle_record(record).await;
            report.push(outcome);
        }

        tracing::info!(
            records = report.total(),
            processed = report.processed,
            failed = report.failed,
            skipped = report.skipped,
            "Batch complete"
        );

        report
    }

    /// Handle a single record; never fails
    pub async fn handle_record(&self, record: &S3EventRecord) -> RecordOutcome {
        let source = match SourceObjectRef::from_record(record) {
            Ok(source) => source,
            Err(e) => return self.report_invalid_record(record, e).await,
        };

        if source.bucket == self.destination_bucket && is_variant_key(&source.key) {
            tracing::warn!(
                bucket = %source.bucket,
                key = %source.key,
                "Skipping generated variant to avoid reprocessing"
            );
            return RecordOutcome::Skipped {
                bucket: source.bucket,
                key: source.key,
                reason: "object is a generated variant".to_string(),
            };
        }

        tracing::info!(
            bucket = %source.bucket,
            key = %source.key,
            event_name = %record.event_name,
            size_bytes = ?record.s3.object.size,
            "Processing s3://{}/{}",
            source.bucket,
            source.key
        );
        let start = Instant::now();

        match self.process_source(&source).await {
            Ok(variants) => {
                tracing::info!(
                    bucket = %source.bucket,
                    key = %source.key,
                    variants = variants.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Processed source image"
                );
                publish_best_effort(
                    self.notifier.as_ref(),
                    SUBJECT_PROCESSED,
                    &format!("Processed {} successfully.", source.key),
                )
                .await;

                RecordOutcome::Processed {
                    bucket: source.bucket,
                    key: source.key,
                    variants,
                }
            }
            Err(e) => {
                tracing::error!(
                    bucket = %source.bucket,
                    key = %source.key,
                    error_kind = e.kind().as_str(),
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Error processing {}",
                    source.key
                );
                self.publish_failure(&source.key, &e).await;

                RecordOutcome::Failed {
                    bucket: Some(source.bucket),
                    key: source.key,
                    kind: e.kind().as_str(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn process_source(
        &self,
        source: &SourceObjectRef,
    ) -> Result<Vec<UploadedVariant>, ProcessingError> {
        let body = self
            .store
            .get_object(&source.bucket, &source.key)
            .await
            .map_err(|e| ProcessingError::Fetch {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: e,
            })?;

        self.pipeline
            .process(&body, &self.destination_bucket, &source.key)
            .await
    }

    async fn report_invalid_record(
        &self,
        record: &S3EventRecord,
        error: ProcessingError,
    ) -> RecordOutcome {
        // Prefer the decoded key, fall back to the raw one, then a placeholder
        let raw_key = &record.s3.object.key;
        let key = if raw_key.is_empty() {
            UNKNOWN_KEY.to_string()
        } else {
            decode_key(raw_key).unwrap_or_else(|_| raw_key.clone())
        };
        let bucket = Some(record.s3.bucket.name.clone()).filter(|b| !b.trim().is_empty());

        tracing::error!(
            bucket = bucket.as_deref().unwrap_or_default(),
            key = %key,
            error_kind = error.kind().as_str(),
            error = %error,
            "Error processing {}",
            key
        );
        self.publish_failure(&key, &error).await;

        RecordOutcome::Failed {
            bucket,
            key,
            kind: error.kind().as_str(),
            error: error.to_string(),
        }
    }

    async fn publish_failure(&self, key: &str, error: &ProcessingError) {
        publish_best_effort(
            self.notifier.as_ref(),
            SUBJECT_FAILED,
            &format!("Error processing {}: {}", key, error),
        )
        .await;
    }
}
