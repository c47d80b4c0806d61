//! File-backed diagnostics
//!
//! The terminal belongs to the rendered frame, so log output can never go
//! to stdout or stderr. Logging is off unless `TEDIT_LOG` names a
//! directory; `RUST_LOG` filters as usual.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber; returns `None` when logging is disabled
///
/// The guard must stay alive for the process lifetime or buffered log
/// lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let log_dir = PathBuf::from(std::env::var_os("TEDIT_LOG")?);
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "tedit.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tedit=debug"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");
    Some(guard)
}
