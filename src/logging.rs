//! # Structured Logging Module
//!
//! Environment-aware structured logging for action operations and the SQL
//! statements they execute.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// `RUST_LOG` takes precedence over the environment default. Setting
/// `QUERY_ACTION_LOG_FORMAT=json` switches the console output to JSON lines.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("QUERY_ACTION_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // try_init: a host application may already own the global subscriber
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::info!(environment = %environment, json = json, "Structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("QUERY_ACTION_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        "test" => "warn".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for one executed statement
pub fn log_database_operation(
    operation: &str,
    table: &str,
    rows: Option<u64>,
    duration_ms: u64,
    slow: bool,
    error: Option<&str>,
    sql: &str,
) {
    match error {
        Some(error) => tracing::warn!(
            target: "query_action::sql",
            operation = %operation,
            table = %table,
            duration_ms = duration_ms,
            error = %error,
            sql = %sql,
            "statement failed"
        ),
        None if slow => tracing::warn!(
            target: "query_action::sql",
            operation = %operation,
            table = %table,
            rows = rows,
            duration_ms = duration_ms,
            sql = %sql,
            "slow statement"
        ),
        None => tracing::debug!(
            target: "query_action::sql",
            operation = %operation,
            table = %table,
            rows = rows,
            duration_ms = duration_ms,
            sql = %sql,
            "statement executed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_by_environment() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("test"), "warn");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("staging"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
    }
}
