//! # Query Scopes
//!
//! Composable query modifiers. A [`Scope`] is a named, cloneable function from
//! [`QueryBuilder`] to [`QueryBuilder`]; actions apply their scopes in the
//! order they were given, after the table and soft-delete column are set.
//!
//! Built-in scopes that receive nothing to filter on (an empty id list, an
//! empty keyword, no pagination) leave the query untouched instead of
//! producing an always-false condition.
//!
//! ```rust
//! use query_action::query_builder::QueryBuilder;
//! use query_action::scopes::{apply_scopes, where_id, where_like_keyword};
//!
//! let query = apply_scopes(
//!     QueryBuilder::new("users"),
//!     &[where_id([1, 2]), where_like_keyword("%an%", &["name", "email"])],
//! );
//! assert_eq!(
//!     query.build_sql(),
//!     "SELECT * FROM \"users\" WHERE \"id\" IN (?, ?) AND (\"name\" LIKE ? OR \"email\" LIKE ?)"
//! );
//! ```

use crate::query_builder::{Direction, LimitOffset, Pagination, QueryBuilder, WhereClause};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type ScopeFn = dyn Fn(QueryBuilder) -> QueryBuilder + Send + Sync;

/// A reusable query modifier
#[derive(Clone)]
pub struct Scope {
    name: &'static str,
    apply: Arc<ScopeFn>,
}

impl Scope {
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(QueryBuilder) -> QueryBuilder + Send + Sync + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    /// Scope that returns the query unchanged
    pub fn identity(name: &'static str) -> Self {
        Self::new(name, |query| query)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, query: QueryBuilder) -> QueryBuilder {
        (self.apply)(query)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").field("name", &self.name).finish()
    }
}

/// Apply `scopes` to `query` in order
pub fn apply_scopes(query: QueryBuilder, scopes: &[Scope]) -> QueryBuilder {
    scopes.iter().fold(query, |query, scope| scope.apply(query))
}

/// `column IN (values...)`; no-op for an empty list
pub fn where_in_column<I, V>(column: &str, values: I) -> Scope
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Scope::identity("where_in_column");
    }
    let column = column.to_string();
    Scope::new("where_in_column", move |query| {
        query.where_in(&column, values.clone())
    })
}

/// Restrict to the given primary keys
pub fn where_id<I, V>(ids: I) -> Scope
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    where_in_column("id", ids)
}

/// Match `keyword` against any of `columns` with LIKE.
///
/// The keyword is bound as given, so callers add their own `%` wildcards.
pub fn where_like_keyword(keyword: &str, columns: &[&str]) -> Scope {
    if keyword.is_empty() || columns.is_empty() {
        return Scope::identity("where_like_keyword");
    }
    let keyword = keyword.to_string();
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    Scope::new("where_like_keyword", move |query| {
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        query.where_clause(WhereClause::like_any(&columns, keyword.clone()))
    })
}

/// `column BETWEEN min AND max`
pub fn between_column(column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Scope {
    let column = column.to_string();
    let (min, max) = (min.into(), max.into());
    Scope::new("between_column", move |query| {
        query.where_between(&column, min.clone(), max.clone())
    })
}

/// `column = value`
pub fn where_column(column: &str, value: impl Into<Value>) -> Scope {
    let column = column.to_string();
    let value = value.into();
    Scope::new("where_column", move |query| {
        query.where_eq(&column, value.clone())
    })
}

/// Raw condition with `?` placeholders bound from `values` in order
pub fn where_raw(sql: &str, values: Vec<Value>) -> Scope {
    let sql = sql.to_string();
    Scope::new("where_raw", move |query| query.where_raw(&sql, values.clone()))
}

/// LIMIT/OFFSET for the requested page; no-op without a pagination object
pub fn paginate<P: Pagination + ?Sized>(pagination: Option<&P>) -> Scope {
    match pagination {
        Some(pagination) => {
            let window = LimitOffset::from_pagination(pagination);
            Scope::new("paginate", move |query| query.paginate(window))
        }
        None => Scope::identity("paginate"),
    }
}

/// Include soft-deleted rows
pub fn with_trashed() -> Scope {
    Scope::new("with_trashed", QueryBuilder::unscoped)
}

/// Append `ORDER BY column direction`
pub fn order_by(column: &str, direction: Direction) -> Scope {
    let column = column.to_string();
    Scope::new("order_by", move |query| query.order_by(&column, direction))
}
