//! railwatch - train detection client
//!
//! Uploads a video to the detection service, follows the upload session and
//! prints the normalized schedule comparison, object breakdown and model metrics.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use railwatch_client::models::ModelMetrics;
use railwatch_client::report::{render_metrics, render_result};
use railwatch_client::{
    CliOverrides, ClientConfig, DetectionClient, MetricsSource, MetricsState, UploadSession,
    VideoFile,
};
use railwatch_common::config::{load_config, TomlConfig};
use railwatch_common::events::{EventBus, SessionEvent, SessionStatus};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "railwatch_client=info,railwatch_common=info";

/// Command-line arguments for railwatch
#[derive(Parser, Debug)]
#[command(name = "railwatch")]
#[command(about = "Submit videos to the train detection service and inspect the results")]
#[command(version)]
struct Args {
    /// Detection service base URL (overrides RAILWATCH_SERVICE_URL and config)
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Config file (default: <config dir>/railwatch/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Upload request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a video and show the detection results
    Detect {
        /// Video file to analyze
        video: PathBuf,

        /// Confidence threshold: 0.1, 0.2, ..., 1.0
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch model metrics from the service
    Metrics {
        /// Print the metrics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_config(args.config.as_deref()).context("Failed to load config")?;
    init_tracing(&toml_config);

    let threshold = match &args.command {
        Command::Detect { threshold, .. } => *threshold,
        Command::Metrics { .. } => None,
    };
    let overrides = CliOverrides {
        service_url: args.service_url.clone(),
        threshold,
        upload_timeout_secs: args.timeout_secs,
    };
    let config = ClientConfig::resolve(&overrides, &toml_config)
        .context("Invalid configuration")?;
    info!("Detection service: {}", config.service_url);

    let client = Arc::new(
        DetectionClient::new(&config).context("Failed to create detection client")?,
    );
    let event_bus = EventBus::new(256);

    match args.command {
        Command::Detect { video, json, .. } => {
            run_detect(client, event_bus, &config, video, json).await
        }
        Command::Metrics { json } => run_metrics(client, event_bus, json).await,
    }
}

fn init_tracing(toml_config: &TomlConfig) {
    let fallback = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_detect(
    client: Arc<DetectionClient>,
    event_bus: EventBus,
    config: &ClientConfig,
    video: PathBuf,
    json: bool,
) -> Result<()> {
    let video = VideoFile::from_path(&video)
        .with_context(|| format!("Cannot read video {}", video.display()))?;

    let mut session = UploadSession::new(event_bus.clone());
    session.set_threshold(config.threshold.as_f64());
    session.select_file(video);

    let progress_task = tokio::spawn(print_progress(event_bus.subscribe()));

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    let ctrl_c_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling upload");
            ctrl_c_cancel.cancel();
        }
    });

    let outcome = session.submit(client.as_ref(), &cancel).await;
    progress_task.abort();
    ctrl_c_task.abort();
    eprintln!();

    if let Err(e) = &outcome {
        if e.is_validation() {
            bail!("{}", e);
        }
    }

    let mut metrics_source = MetricsSource::new(client, event_bus);
    let metrics_state = metrics_source
        .resolve(session.result(), session.refresh_signal())
        .await
        .clone();

    match session.status() {
        SessionStatus::Succeeded => {
            if let Some(result) = session.result() {
                if json {
                    let output = serde_json::json!({
                        "result": result,
                        "metrics": metrics_of(&metrics_state),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    println!("{}", render_result(result));
                    println!("{}", render_metrics(&metrics_state));
                }
            }
            Ok(())
        }
        status => {
            let message = session
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Session ended in status {}", status));
            if !json {
                println!("{}", render_metrics(&metrics_state));
            }
            bail!(message)
        }
    }
}

async fn run_metrics(client: Arc<DetectionClient>, event_bus: EventBus, json: bool) -> Result<()> {
    let mut metrics_source = MetricsSource::new(client, event_bus);
    let state = metrics_source.resolve(None, 0).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics_of(state))?);
    } else {
        println!("{}", render_metrics(state));
    }
    Ok(())
}

fn metrics_of(state: &MetricsState) -> ModelMetrics {
    match state {
        MetricsState::Ready(metrics) => metrics.clone(),
        MetricsState::Loading => ModelMetrics::default(),
    }
}

/// Print upload progress from the event bus until aborted
async fn print_progress(mut rx: tokio::sync::broadcast::Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::UploadProgress { percent, .. }) => {
                eprint!("\r{}% uploaded", percent);
                let _ = std::io::stderr().flush();
            }
            Ok(_) => {}
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}
