//! Structured logging schema and subscriber setup shared by the binaries.
//!
//! ## Field names
//!
//! Structured events from the API and the consumer share these keys so log
//! aggregation can query both the same way:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | "api", "db", "auth", "queue" |
//! | `component` | part of a subsystem, e.g. "pool", "graph_events" |
//! | `op` | logical operation, e.g. "create_note" |
//! | `user_id` / `note_id` | entity UUIDs |
//! | `queue` / `event` | Redis list and graph event name |
//! | `error` | error message of a failed operation |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), logins, processed events |
//! | DEBUG | Per-request decisions, counts, config choices |
//! | TRACE | Per-item iteration |
//!
//! ## Environment
//!
//! - `LOG_FORMAT`: `json` or `text` (default `text`)
//! - `LOG_FILE`: path of a daily-rotated log file (optional)
//! - `LOG_ANSI`: `true`/`false` to force ANSI colors
//! - `RUST_LOG`: standard env filter

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse `LOG_FORMAT`; anything other than `json` means text.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Parse `LOG_ANSI`.
fn parse_ansi(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Split `LOG_FILE` into directory and file name for the rolling appender.
fn split_log_path<'a>(path: &'a str, default_file_name: &'a str) -> (&'a Path, &'a str) {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(default_file_name);
    (dir, file_name)
}

/// Install the global subscriber from the environment.
///
/// `default_filter` applies when `RUST_LOG` is unset. The returned guard must
/// be held for the lifetime of the process when file logging is enabled,
/// otherwise buffered lines are lost.
pub fn init(default_filter: &str, default_file_name: &str) -> Option<WorkerGuard> {
    let log_format =
        LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()));
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI").ok().map(|v| parse_ansi(&v));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let (dir, file_name) = split_log_path(path, default_file_name);
        let file_appender = tracing_appender::rolling::daily(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match log_format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(log_ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    } else {
        match log_format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = log_ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    };

    tracing::info!(
        log_format = ?log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    guard
}
