//! Logging setup for the Dialbridge application.
//!
//! Writes human-readable logs to the console and, when a log file is
//! configured, to that file as well through a non-blocking appender.

use dialbridge_config::LoggingConfig;
use std::path::Path;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber from the logging section of the
/// configuration. Defaults to INFO.
///
/// Returns the file appender's worker guard; keep it alive for the lifetime
/// of the process or buffered file output is lost on shutdown.
pub fn init(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let log_file = config.and_then(|logging| logging.file.as_deref());
    init_with_level(Level::INFO, log_file)
}

/// Initialize the tracing subscriber with a specific minimum level and an
/// optional log file path.
pub fn init_with_level(level: Level, log_file: Option<&str>) -> Option<WorkerGuard> {
    // RUST_LOG wins when set; otherwise everything logs at the given level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let path = Path::new(path);
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .unwrap_or_else(|| "dialbridge.log".as_ref());

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Use try_init to handle the case where a subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        match log_file {
            Some(path) => info!("Logging initialized at level {} (file: {})", level, path),
            None => info!("Logging initialized at level {}", level),
        }
    }
    guard
}
