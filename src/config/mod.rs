// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::image_optimizer::ImageLimits;

/// Environment variable names read by `Config::from_env`
pub const ENV_PROCESSED_BUCKET: &str = "PROCESSED_BUCKET";
pub const ENV_SNS_TOPIC_ARN: &str = "SNS_TOPIC_ARN";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_S3_FORCE_PATH_STYLE: &str = "S3_FORCE_PATH_STYLE";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_MAX_SOURCE_PIXELS: &str = "MAX_SOURCE_PIXELS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bucket every variant is written to
    pub destination_bucket: String,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub s3: S3Config,
    #[serde(default)]
    pub limits: ImageLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// SNS topic for outcome notifications; absent disables publishing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
}

impl NotificationConfig {
    /// The topic to publish to, if publishing is enabled
    pub fn enabled_topic(&self) -> Option<&str> {
        self.topic_arn
            .as_deref()
            .map(str::trim)
            .filter(|arn| !arn.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Custom endpoint (MinIO, LocalStack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("Unknown log format '{}', expected json or pretty", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    /// Minimal configuration writing to `destination_bucket` with publishing disabled
    pub fn new(destination_bucket: impl Into<String>) -> Self {
        Self {
            destination_bucket: destination_bucket.into(),
            notification: NotificationConfig::default(),
            s3: S3Config::default(),
            limits: ImageLimits::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let destination_bucket = get(ENV_PROCESSED_BUCKET).ok_or_else(|| {
            format!(
                "Environment variable '{}' is required but not set",
                ENV_PROCESSED_BUCKET
            )
        })?;

        let mut config = Config::new(destination_bucket.trim());
        config.notification.topic_arn = get(ENV_SNS_TOPIC_ARN);
        config.s3.region = get(ENV_AWS_REGION);
        config.s3.endpoint = get(ENV_S3_ENDPOINT);

        if let Some(value) = get(ENV_S3_FORCE_PATH_STYLE) {
            config.s3.force_path_style = parse_bool(&value).ok_or_else(|| {
                format!("{} must be true or false, got '{}'", ENV_S3_FORCE_PATH_STYLE, value)
            })?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.logging.format = format.parse()?;
        }
        if let Some(value) = get(ENV_MAX_SOURCE_PIXELS) {
            config.limits.max_source_pixels = value.trim().parse().map_err(|e| {
                format!("{} must be an integer, got '{}': {}", ENV_MAX_SOURCE_PIXELS, value, e)
            })?;
        }

        Ok(config)
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Load from `path` when given, otherwise from the environment, then validate
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.destination_bucket.trim().is_empty() {
            return Err("destination_bucket cannot be empty".to_string());
        }

        if let Some(topic) = &self.notification.topic_arn {
            if topic.trim().is_empty() {
                return Err(
                    "notification.topic_arn cannot be empty; omit it to disable notifications"
                        .to_string(),
                );
            }
        }

        match (&self.s3.access_key, &self.s3.secret_key) {
            (Some(_), None) => {
                return Err("s3.access_key is set but s3.secret_key is missing".to_string())
            }
            (None, Some(_)) => {
                return Err("s3.secret_key is set but s3.access_key is missing".to_string())
            }
            _ => {}
        }

        if let Some(endpoint) = &self.s3.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "s3.endpoint '{}' must start with http:// or https://",
                    endpoint
                ));
            }
        }

        if self.limits.max_source_pixels == 0
            || self.limits.max_source_width == 0
            || self.limits.max_source_height == 0
        {
            return Err("limits must be greater than 0".to_string());
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
