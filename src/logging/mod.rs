// Logging module for structured logging using the tracing crate

use std::error::Error;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Build the event filter: `RUST_LOG` when set, otherwise the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, Box<dyn Error + Send + Sync>> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| format!("Invalid log level '{}': {}", config.level, e).into()),
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - JSON formatting (or human-readable output with `format: pretty`)
/// - Filtering from `RUST_LOG`, falling back to `config.level`
/// - Output to stdout, which the Lambda runtime forwards to CloudWatch
///
/// Calling this more than once is a no-op.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive.
///
/// # Examples
///
/// ```
/// use kasasagi::config::LoggingConfig;
/// use kasasagi::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = build_filter(config)?;

    INITIALIZED.get_or_init(|| {
        let registry = tracing_subscriber::registry().with(filter);

        // A subscriber installed elsewhere (tests, embedding binary) wins
        let _ = match config.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_current_span(true)
                        .with_target(false),
                )
                .try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        };
    });

    Ok(())
}
