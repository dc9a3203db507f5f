use anyhow::Context;
use clap::Parser;
use lambda_runtime::{run, service_fn, LambdaEvent};
use std::path::{Path, PathBuf};
use tracing::Instrument;

use kasasagi::clients::AwsClients;
use kasasagi::config::Config;
use kasasagi::dispatcher::{BatchReport, EventDispatcher};
use kasasagi::event::S3Event;

/// Kasasagi - generates watermarked thumbnail and medium variants of uploaded images
#[derive(Parser, Debug)]
#[command(name = "kasasagi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file (environment variables are used otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Process a single event JSON file and exit instead of serving the Lambda runtime
    #[arg(short, long)]
    event: Option<PathBuf>,
}

async fn handler(
    event: LambdaEvent<S3Event>,
    dispatcher: &EventDispatcher,
) -> Result<BatchReport, lambda_runtime::Error> {
    let span = tracing::info_span!(
        "invocation",
        request_id = %event.context.request_id,
        records = event.payload.records.len()
    );

    Ok(dispatcher.dispatch(&event.payload).instrument(span).await)
}

async fn run_once(path: &Path, dispatcher: &EventDispatcher) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    let event: S3Event = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse event file {}", path.display()))?;

    let report = dispatcher.dispatch(&event).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).map_err(|e| anyhow::anyhow!(e))?;

    kasasagi::logging::init_subscriber(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        config_file = ?args.config,
        destination_bucket = %config.destination_bucket,
        max_source_pixels = config.limits.max_source_pixels,
        "Configuration loaded successfully"
    );

    let clients = AwsClients::from_config(&config).await;
    let notifier = clients.notifier(&config);
    tracing::info!(
        notifications_enabled = notifier.is_enabled(),
        "AWS clients ready"
    );
    let dispatcher = EventDispatcher::new(&config, clients.object_store(), notifier);

    if let Some(path) = &args.event {
        return run_once(path, &dispatcher).await;
    }

    tracing::info!("Starting Lambda runtime");
    run(service_fn(|event| handler(event, &dispatcher)))
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
