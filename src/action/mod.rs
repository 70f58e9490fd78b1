//! # Actions
//!
//! [`Action`] is the chainable, record-typed entry point of the crate. It
//! bundles a pool, the target table, composed scopes, joins and extra WHERE
//! clauses, and the tracing options; read and write operations then run
//! against that composition.
//!
//! Builder methods consume the action and hand it back, so an action is set
//! up once and then reused for any number of operations:
//!
//! ```rust,no_run
//! use query_action::prelude::*;
//! # use serde::Serialize;
//! # #[derive(Serialize, sqlx::FromRow)]
//! # struct User { #[serde(flatten)] #[sqlx(flatten)] base: BaseModel, name: String }
//! # impl Record for User {
//! #     fn table_name() -> &'static str { "users" }
//! #     fn id(&self) -> RecordId { self.base.id }
//! #     fn set_id(&mut self, id: RecordId) { self.base.id = id }
//! # }
//! # async fn example(pool: BackendPool) -> query_action::Result<()> {
//! let action = Action::<User>::new(pool)
//!     .scopes(vec![where_like_keyword("%an%", &["name"])])
//!     .order("name")
//!     .asc();
//!
//! let mut page = Page::new(1, 20);
//! let users = action.list_paged(&mut page, &[]).await?;
//! println!("{} of {} users", users.len(), page.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Operation groups
//!
//! - `query` - first/last/list/count and their trashed and by-id variants
//! - `mutation` - create, batch create, update, delete and forced delete
//! - [`order`] - the ORDER BY builder returned by [`Action::order`]
//! - [`association`] - many-to-many join-table management

pub mod association;
mod executor;
mod mutation;
pub mod order;
mod query;

pub use association::{Association, AssociationKey};
pub use order::Order;

use crate::config::ActionConfig;
use crate::database::BackendPool;
use crate::models::{Record, RecordId};
use crate::query_builder::{qualified, Join, QueryBuilder, WhereClause};
use crate::scopes::{apply_scopes, where_in_column, Scope};
use crate::trace::TraceContext;
use std::fmt;
use std::marker::PhantomData;
use tracing::Span;

/// Target for all spans opened by actions
pub const TRACE_TARGET: &str = "query_action";

/// Chainable operations over records of type `T`
pub struct Action<T: Record> {
    pool: BackendPool,
    table: Option<String>,
    scopes: Vec<Scope>,
    joins: Vec<Join>,
    clauses: Vec<WhereClause>,
    config: ActionConfig,
    trace: bool,
    parent: Option<Span>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Action<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            scopes: self.scopes.clone(),
            joins: self.joins.clone(),
            clauses: self.clauses.clone(),
            config: self.config.clone(),
            trace: self.trace,
            parent: self.parent.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("table", &self.table_name())
            .field("scopes", &self.scopes)
            .field("joins", &self.joins)
            .field("clauses", &self.clauses)
            .field("trace", &self.trace)
            .finish()
    }
}

impl<T: Record> Action<T> {
    /// Create an action on `pool` with default configuration
    pub fn new(pool: BackendPool) -> Self {
        Self::with_config(pool, ActionConfig::default())
    }

    /// Create an action on `pool`; tracing starts open when `config.trace_enabled`
    pub fn with_config(pool: BackendPool, config: ActionConfig) -> Self {
        Self {
            pool,
            table: None,
            scopes: Vec::new(),
            joins: Vec::new(),
            clauses: Vec::new(),
            trace: config.trace_enabled,
            config,
            parent: None,
            _record: PhantomData,
        }
    }

    /// Swap the pool, keeping the composition
    pub fn with_pool(mut self, pool: BackendPool) -> Self {
        self.pool = pool;
        self
    }

    /// Override the record's table name
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Parent span for the spans opened by traced operations
    pub fn with_span(mut self, span: Span) -> Self {
        self.parent = Some(span);
        self
    }

    /// Append scopes applied to every operation
    pub fn scopes(mut self, scopes: Vec<Scope>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    /// Join another table; `scopes` typically filter on the joined table
    pub fn joins(mut self, join: Join, scopes: Vec<Scope>) -> Self {
        self.joins.push(join);
        self.scopes.extend(scopes);
        self
    }

    /// Append WHERE clauses applied to every operation
    pub fn clauses(mut self, clauses: Vec<WhereClause>) -> Self {
        self.clauses.extend(clauses);
        self
    }

    /// Start an ORDER BY on `column`
    pub fn order(self, column: &str) -> Order<T> {
        Order::new(column, self)
    }

    pub fn open_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    pub fn close_trace(mut self) -> Self {
        self.trace = false;
        self
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.trace
    }

    pub fn pool(&self) -> &BackendPool {
        &self.pool
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or_else(|| T::table_name())
    }

    /// The composed query: table, soft-delete column, joins, clauses and scopes
    pub fn query(&self) -> QueryBuilder {
        let query = self
            .joins
            .iter()
            .cloned()
            .fold(
                QueryBuilder::new(self.table_name()).soft_delete(T::soft_delete_column()),
                QueryBuilder::join,
            );
        let query = self
            .clauses
            .iter()
            .cloned()
            .fold(query, QueryBuilder::where_clause);
        apply_scopes(query, &self.scopes)
    }

    /// Many-to-many helper bound to `owner`
    pub fn association(&self, owner: &T) -> crate::error::Result<Association<'_, T>> {
        Association::new(self, owner)
    }

    /// The composed query with `extra` scopes applied after the action's own
    pub(crate) fn scoped(&self, extra: &[Scope]) -> QueryBuilder {
        apply_scopes(self.query(), extra)
    }

    /// Primary-key column, qualified with the table once joins are present
    pub(crate) fn pk_column(&self) -> String {
        if self.joins.is_empty() {
            T::primary_key().to_string()
        } else {
            qualified(self.table_name(), T::primary_key())
        }
    }

    pub(crate) fn where_pk(&self, id: RecordId) -> Scope {
        where_in_column(&self.pk_column(), [id])
    }

    pub(crate) fn trace_context(&self, operation: &'static str) -> TraceContext {
        TraceContext::new(
            operation,
            self.table_name(),
            self.config.slow_statement_threshold(),
        )
    }

    /// Span for one operation; disabled unless tracing is open
    pub(crate) fn operation_span(&self, operation: &'static str) -> Span {
        if !self.trace {
            return Span::none();
        }
        match self.parent {
            Some(ref parent) => tracing::info_span!(
                target: TRACE_TARGET,
                parent: parent,
                "action",
                operation = operation,
                table = %self.table_name()
            ),
            None => tracing::info_span!(
                target: TRACE_TARGET,
                "action",
                operation = operation,
                table = %self.table_name()
            ),
        }
    }
}
