//! flowpipe - Main Entry Point
//!
//! Runs the greeting network. Usage: `flowpipe [config.toml]`.

use anyhow::Context;
use flowpipe::config::{LoggingConfig, PipelineConfig};
use flowpipe::greeting;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path {:?} has no file name", path))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => PipelineConfig::load(&path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => PipelineConfig::default(),
    };

    // Keep the guard alive so buffered log lines reach the file.
    let _log_guard = init_logging(&config.logging)?;

    tracing::info!(
        "Starting flowpipe with parallelism {} and buffer size {}",
        config.runner.parallelism,
        config.runner.buffer_size
    );

    let network = greeting::build(&config)?;
    let sink_stats = network.sink_stats();
    let report = network.run()?;

    if !report.all_completed() {
        for stage in report.stages.iter().filter(|s| s.panicked) {
            tracing::error!("Stage '{}' did not complete", stage.name);
        }
        anyhow::bail!("pipeline finished with panicked stages");
    }

    match sink_stats {
        Some(stats) => tracing::info!(
            "Wrote {} items ({} bytes) to {:?} in {:?}",
            stats.items(),
            stats.bytes(),
            config.sink.path,
            report.elapsed
        ),
        None => tracing::info!("Finished in {:?}", report.elapsed),
    }

    Ok(())
}
