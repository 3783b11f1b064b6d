//! pagesnap - semantic page snapshots with stable element refs.
//!
//! Main entry point for the pagesnap CLI.

mod cli;
mod cmd_config;
mod cmd_snapshot;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagesnap_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};
use crate::cmd_snapshot::SnapshotOptions;

/// Initialize tracing with console output and optional daily-rotated log files.
///
/// Console logs go to stderr so stdout carries only snapshot output.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = if logging.file {
        std::fs::create_dir_all(&logging.dir)?;
        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("pagesnap")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&logging.dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The writer flushes until the guard drops.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(file_layer)
        .init();

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.logging)?;
    debug!("Loaded configuration: {:?}", config);

    if !matches!(cli.command, Commands::CheckConfig) {
        let validation = ConfigValidator::validate(&config);
        for warning in &validation.warnings {
            warn!("{}: {}", warning.path, warning.message);
        }
        if let Some(err) = validation.into_error() {
            return Err(err.into());
        }
    }

    match cli.command {
        Commands::Snapshot {
            capture,
            format,
            framed,
            diff,
            no_frames,
        } => {
            let mut analyzer_config = cmd_snapshot::analyzer_config(&config);
            if no_frames {
                analyzer_config.include_frames = false;
            }
            let options = SnapshotOptions {
                format: format.as_deref().unwrap_or(&config.output.format),
                framed: framed || config.output.framed,
                diff: diff.as_deref(),
            };
            cmd_snapshot::snapshot(&capture, analyzer_config, options)
        }
        Commands::Resolve { capture, ref_id } => {
            cmd_snapshot::resolve(&capture, cmd_snapshot::analyzer_config(&config), &ref_id)
        }
        Commands::CheckConfig => cmd_config::check_config(&config),
    }
}
