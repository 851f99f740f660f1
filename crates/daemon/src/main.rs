use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eeg_acquisition::{EegSource, MockSource, PlaybackSource};
use focus_daemon::actuator::ActuatorLink;
use focus_daemon::config::load_or_init;
use focus_daemon::session::SessionRunner;
use focus_types::{SessionConfig, SourceKind};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the session configuration file
    #[arg(long, default_value = "focus.yaml")]
    config: PathBuf,

    /// Use the synthetic EEG source regardless of configuration
    #[arg(long)]
    mock: bool,

    /// Ignore the task schedule and run in live monitoring mode
    #[arg(long)]
    monitor: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn build_source(config: &SessionConfig) -> anyhow::Result<Box<dyn EegSource>> {
    let source: Box<dyn EegSource> = match &config.source {
        SourceKind::MockEeg { profile } => {
            tracing::info!("Using synthetic EEG source ({:?} profile)", profile);
            Box::new(MockSource::new(
                config.sample_rate_hz,
                config.window_samples,
                *profile,
            )?)
        }
        SourceKind::Playback { path } => {
            tracing::info!("Replaying recorded EEG from {}", path.display());
            Box::new(PlaybackSource::new(
                path.clone(),
                config.sample_rate_hz,
                config.window_samples,
            )?)
        }
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focus_daemon=info,eeg_acquisition=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Focus daemon starting...");

    let args = Args::parse();
    let mut config = load_or_init(&args.config)?;
    if args.mock && !matches!(config.source, SourceKind::MockEeg { .. }) {
        config.source = SourceKind::default();
    }
    if args.monitor {
        config.tasks.clear();
    }
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = build_source(&config)?;
    let actuator = match &config.serial {
        Some(serial) => ActuatorLink::open_serial(serial)
            .with_context(|| format!("could not open actuator port '{}'", serial.port))?,
        None => {
            tracing::warn!("No serial transport configured; decisions will be discarded");
            ActuatorLink::discard()
        }
    };

    let (runner, _history_feed) = SessionRunner::new(config, source, actuator)?;
    let token = CancellationToken::new();
    let mut session = tokio::spawn(runner.run(token.clone()));

    let outcome = tokio::select! {
        res = &mut session => res.context("session task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received. Stopping session...");
            token.cancel();
            session.await.context("session task panicked")??
        }
    };

    tracing::info!(
        "Session finished: {:?} after {} ticks{}",
        outcome.reason,
        outcome.ticks,
        match &outcome.log_path {
            Some(path) => format!(", log at {}", path.display()),
            None => String::new(),
        }
    );
    Ok(())
}
