use super::ident::quote_ident;
use crate::database::SqlBuilder;
use std::fmt;

/// Represents the JOIN flavours actions can compose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Cross => "CROSS JOIN",
        };
        f.write_str(keyword)
    }
}

/// Represents a SQL JOIN clause.
///
/// The ON condition is raw SQL: it compares columns of the two tables and
/// carries no bind parameters. Filters on the joined table belong in scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: Option<String>,
}

impl Join {
    /// Create an INNER JOIN
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Inner,
            table: table.to_string(),
            on_condition: Some(on_condition.to_string()),
        }
    }

    /// Create a LEFT JOIN
    pub fn left(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Left,
            table: table.to_string(),
            on_condition: Some(on_condition.to_string()),
        }
    }

    /// Create a CROSS JOIN
    pub fn cross(table: &str) -> Self {
        Self {
            join_type: JoinType::Cross,
            table: table.to_string(),
            on_condition: None,
        }
    }

    pub fn push_sql(&self, qb: &mut SqlBuilder) {
        qb.push(format!(" {} {}", self.join_type, quote_ident(&self.table)));
        if let Some(ref condition) = self.on_condition {
            qb.push(format!(" ON {condition}"));
        }
    }
}
