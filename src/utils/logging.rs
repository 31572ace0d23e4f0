use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::WorkerGuard;
use anyhow::Result;
use crate::config::LoggingSettings;

/// Initializes the logging system for the simulator
///
/// Events always go to stdout. When `settings.path` is set, they are also written to a daily-rotated
/// `plant-sim.log.{date}` file in that directory through a non-blocking writer.
/// The filter comes from `RUST_LOG` when present, otherwise from `settings.level`.
///
/// # Returns
///
/// * `Ok(Some(WorkerGuard))`: File logging is active; keep the guard alive for the life of the process
/// * `Ok(None)`: Console-only logging is active
/// * `Err(anyhow::Error)`: The filter was invalid or a global subscriber was already installed
pub fn init_logger(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let format = fmt::format()
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let console_layer = fmt::Layer::default()
        .event_format(format.clone().with_ansi(true))
        .with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    match &settings.path {
        Some(path) => {
            std::fs::create_dir_all(path)?;

            let file_appender = RollingFileAppender::new(Rotation::DAILY, path, "plant-sim.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::Layer::default()
                .event_format(format)
                .with_writer(non_blocking);

            tracing::subscriber::set_global_default(subscriber.with(file_layer))?;
            tracing::info!("Logging initialized, writing to {:?}", path);
            Ok(Some(guard))
        }
        None => {
            tracing::subscriber::set_global_default(subscriber)?;
            tracing::info!("Logging initialized (console only)");
            Ok(None)
        }
    }
}
