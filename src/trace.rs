//! # Statement Tracing
//!
//! Timing and structured logging around every statement an action executes.
//! A [`StatementTrace`] is started right before the statement is sent and
//! finished with its outcome; the finished trace reports SQL text, affected or
//! returned rows, elapsed time and any error through
//! [`log_database_operation`].

use crate::logging::log_database_operation;
use std::time::{Duration, Instant};

/// Names the statement being traced
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub operation: &'static str,
    pub table: String,
    pub slow_threshold: Duration,
}

impl TraceContext {
    pub fn new(operation: &'static str, table: &str, slow_threshold: Duration) -> Self {
        Self {
            operation,
            table: table.to_string(),
            slow_threshold,
        }
    }
}

/// In-flight statement timing
#[derive(Debug)]
pub struct StatementTrace<'a> {
    context: &'a TraceContext,
    sql: String,
    started: Instant,
}

impl<'a> StatementTrace<'a> {
    pub fn start(context: &'a TraceContext, sql: &str) -> Self {
        Self {
            context,
            sql: sql.to_string(),
            started: Instant::now(),
        }
    }

    /// Log the outcome and hand the result back unchanged
    pub fn finish<T, E, F>(self, result: Result<T, E>, rows: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnOnce(&T) -> u64,
    {
        let elapsed = self.started.elapsed();
        let slow = elapsed >= self.context.slow_threshold;
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(value) => log_database_operation(
                self.context.operation,
                &self.context.table,
                Some(rows(value)),
                duration_ms,
                slow,
                None,
                &self.sql,
            ),
            Err(error) => log_database_operation(
                self.context.operation,
                &self.context.table,
                None,
                duration_ms,
                slow,
                Some(&error.to_string()),
                &self.sql,
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_passes_result_through() {
        let context = TraceContext::new("Count", "users", Duration::from_millis(200));

        let ok: Result<i64, String> =
            StatementTrace::start(&context, "SELECT COUNT(*) FROM \"users\"").finish(Ok(3), |_| 1);
        assert_eq!(ok, Ok(3));

        let err: Result<i64, String> = StatementTrace::start(&context, "SELECT broken")
            .finish(Err("no such table".to_string()), |_| 0);
        assert_eq!(err, Err("no such table".to_string()));
    }

    #[test]
    fn test_zero_threshold_marks_everything_slow() {
        let context = TraceContext::new("List", "users", Duration::ZERO);
        let rows: Result<Vec<i64>, String> = StatementTrace::start(&context, "SELECT 1")
            .finish(Ok(vec![1, 2]), |rows| rows.len() as u64);
        assert_eq!(rows.map(|r| r.len()), Ok(2));
    }
}
