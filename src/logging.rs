//! Process-wide logging setup
//!
//! Console logging through `tracing-subscriber` with an `EnvFilter`, plus an
//! optional daily-rolling file layer when a log directory is given. The
//! returned guard must stay alive for the duration of the process so buffered
//! file output is flushed.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// When `log_dir` is given, log output is additionally written to a daily
/// rolling file in that directory.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            let _ = std::fs::create_dir_all(dir);

            let file_appender = tracing_appender::rolling::daily(dir, "campusqa.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();

            None
        }
    }
}
