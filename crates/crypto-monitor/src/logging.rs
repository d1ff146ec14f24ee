//! Logging setup.

use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

const DEFAULT_LOG_FILE: &str = "crypto-agent.log";

/// Setup console logging with the given level.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn setup_logging(level: &str, json: bool) -> Result<(), TryInitError> {
    setup_logging_with_file(level, json, None).map(|_| ())
}

/// Setup console logging plus an optional plain-text log file.
///
/// The returned guard flushes the file writer on drop and must be held for
/// as long as logging is needed.
pub fn setup_logging_with_file(
    level: &str,
    json: bool,
    file: Option<&Path>,
) -> Result<Option<WorkerGuard>, TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .with(writer.map(file_layer))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .with(writer.map(file_layer))
            .try_init()?;
    }

    Ok(guard)
}

fn file_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer().with_writer(writer).with_ansi(false)
}
