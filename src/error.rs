//! # Action Error Types
//!
//! Structured errors for every action operation, built with thiserror instead of
//! stringly-typed variants so callers can match on the failure kind.

use thiserror::Error;

/// Errors produced by actions, scopes and the supporting infrastructure
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Refusing to {operation} `{table}` without a WHERE condition")]
    MissingWhereClause {
        operation: &'static str,
        table: String,
    },

    #[error("Record in `{table}` has no primary key value")]
    MissingPrimaryKey { table: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record for `{table}`: {message}")]
    InvalidRecord { table: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ActionError {
    /// True when the underlying database reported that no row matched
    pub fn is_row_not_found(&self) -> bool {
        matches!(self, ActionError::Database(sqlx::Error::RowNotFound))
    }

    pub(crate) fn invalid_record(table: &str, message: impl Into<String>) -> Self {
        ActionError::InvalidRecord {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ActionError {
    fn from(err: config::ConfigError) -> Self {
        ActionError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_where_clause_message() {
        let err = ActionError::MissingWhereClause {
            operation: "delete",
            table: "users".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Refusing to delete `users` without a WHERE condition"
        );
    }

    #[test]
    fn test_row_not_found_detection() {
        let err = ActionError::from(sqlx::Error::RowNotFound);
        assert!(err.is_row_not_found());
        assert!(!ActionError::Configuration("bad".into()).is_row_not_found());
    }
}
