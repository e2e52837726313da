//! Console and rotating-file log sinks for one run.

use std::fs;
use std::path::Path;

use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const LOG_FILE: &str = "daily-wallpaper.log";

/// Keeps the subscriber installed and the file writer flushing.
pub struct LogGuard {
    _default: DefaultGuard,
    _file: Option<WorkerGuard>,
}

/// Build the subscriber and install it as the default for this thread.
///
/// `RUST_LOG` wins over `default_level`. When `log_dir` cannot be created
/// only the console sink is installed.
pub fn init(log_dir: &Path, default_level: &str) -> LogGuard {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file, file_guard) = match fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("file logging disabled, cannot create {}: {err}", log_dir.display());
            (None, None)
        }
    };

    let subscriber = Registry::default().with(console.and_then(file).with_filter(filter));
    LogGuard {
        _default: tracing::subscriber::set_default(subscriber),
        _file: file_guard,
    }
}
