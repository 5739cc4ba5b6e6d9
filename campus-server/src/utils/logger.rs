//! Logging setup
//!
//! Console logging by default; set `LOG_DIR` to also get daily-rotated
//! JSON files. `LOG_LEVEL` feeds the env filter (`info` if unset).

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// Keeps the background writer alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logger() {
    match std::env::var("LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => init_logger_with_file(Path::new(&dir)),
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .init();
        }
    }
}

pub fn init_logger_with_file(dir: &Path) {
    let appender = tracing_appender::rolling::daily(dir, "campus-server.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(default_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
}
