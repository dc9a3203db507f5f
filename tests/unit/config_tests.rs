// Configuration loading and validation

use std::collections::HashMap;
use std::io::Write;

use kasasagi::config::*;
use tempfile::NamedTempFile;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

// Test: only the destination bucket is required
#[test]
fn test_minimal_environment() {
    let config = Config::from_lookup(lookup(&[("PROCESSED_BUCKET", "processed")])).unwrap();

    assert_eq!(config.destination_bucket, "processed");
    assert!(config.notification.enabled_topic().is_none());
    assert_eq!(config.logging, LoggingConfig::default());
    assert!(config.validate().is_ok());
}

// Test: a missing bucket is a startup error
#[test]
fn test_missing_bucket_fails() {
    let err = Config::from_lookup(lookup(&[("SNS_TOPIC_ARN", "arn:aws:sns:us-east-1:1:t")]))
        .unwrap_err();
    assert!(err.contains("PROCESSED_BUCKET"));
}

// Test: every recognised variable is applied
#[test]
fn test_full_environment() {
    let config = Config::from_lookup(lookup(&[
        ("PROCESSED_BUCKET", "processed"),
        ("SNS_TOPIC_ARN", "arn:aws:sns:us-east-1:123456789012:images"),
        ("AWS_REGION", "eu-west-1"),
        ("S3_ENDPOINT", "http://localhost:9000"),
        ("S3_FORCE_PATH_STYLE", "true"),
        ("LOG_LEVEL", "debug"),
        ("LOG_FORMAT", "pretty"),
        ("MAX_SOURCE_PIXELS", "1000000"),
    ]))
    .unwrap();

    assert_eq!(
        config.notification.enabled_topic(),
        Some("arn:aws:sns:us-east-1:123456789012:images")
    );
    assert_eq!(config.s3.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.s3.endpoint.as_deref(), Some("http://localhost:9000"));
    assert!(config.s3.force_path_style);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.limits.max_source_pixels, 1_000_000);
    assert!(config.validate().is_ok());
}

// Test: malformed values are reported with the variable name
#[test]
fn test_invalid_values_fail() {
    let err = Config::from_lookup(lookup(&[
        ("PROCESSED_BUCKET", "processed"),
        ("MAX_SOURCE_PIXELS", "lots"),
    ]))
    .unwrap_err();
    assert!(err.contains("MAX_SOURCE_PIXELS"));

    let err = Config::from_lookup(lookup(&[
        ("PROCESSED_BUCKET", "processed"),
        ("S3_FORCE_PATH_STYLE", "sometimes"),
    ]))
    .unwrap_err();
    assert!(err.contains("S3_FORCE_PATH_STYLE"));
}

// Test: load a YAML file from disk
#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
destination_bucket: processed-images
notification:
  topic_arn: "arn:aws:sns:us-east-1:123456789012:images"
s3:
  region: us-east-1
  endpoint: "http://localhost:4566"
  force_path_style: true
limits:
  max_source_pixels: 50000000
logging:
  level: "kasasagi=debug,info"
  format: json
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.destination_bucket, "processed-images");
    assert!(config.notification.enabled_topic().is_some());
    assert_eq!(config.s3.endpoint.as_deref(), Some("http://localhost:4566"));
    assert_eq!(config.limits.max_source_pixels, 50_000_000);
    assert_eq!(config.limits.max_source_width, 65_535);
    assert_eq!(config.logging.format, LogFormat::Json);
}

// Test: a file that fails validation is rejected by load
#[test]
fn test_load_rejects_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "destination_bucket: processed\ns3:\n  endpoint: localhost:9000\n"
    )
    .unwrap();

    let err = Config::load(Some(file.path())).unwrap_err();
    assert!(err.contains("s3.endpoint"));
}

// Test: unreadable paths produce a readable error
#[test]
fn test_missing_file() {
    let err = Config::from_file("/nonexistent/kasasagi.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

// Test: half of a static credential pair is rejected
#[test]
fn test_partial_credentials_rejected() {
    let mut config = Config::new("processed");
    config.s3.access_key = Some("AKIDEXAMPLE".to_string());
    assert!(config.validate().is_err());

    config.s3.secret_key = Some("secret".to_string());
    assert!(config.validate().is_ok());
}
