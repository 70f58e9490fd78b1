#![allow(clippy::doc_markdown)] // Allow technical terms like SQLite, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Query Action
//!
//! Chainable, record-typed CRUD actions on top of SQLx.
//!
//! ## Overview
//!
//! An [`Action`] is bound to one record type and a connection pool. It composes
//! scopes, joins and WHERE clauses once, then runs reads (first, last, list,
//! count), writes (create, batch create, update, delete) and many-to-many
//! association edits against that composition. Soft delete is built in:
//! tombstoned rows are hidden from every default query, and the `_with_trashed`
//! variants or the [`scopes::with_trashed`] scope bring them back.
//!
//! ## Key Features
//!
//! - **Composable Scopes**: reusable query modifiers for id sets, keyword LIKE,
//!   BETWEEN ranges, raw conditions, ordering and pagination
//! - **Pagination Bookkeeping**: list queries count matching rows, record the
//!   total on the pagination object and read one page
//! - **Soft Delete**: integer `deleted_at` tombstones with forced-delete escape hatch
//! - **Safe Writes**: UPDATE and DELETE without a WHERE condition are refused
//! - **Tracing**: per-operation spans and structured per-statement logging
//!
//! ## Module Organization
//!
//! - [`action`] - The `Action` builder, order builder and associations
//! - [`scopes`] - Built-in scopes and scope composition
//! - [`query_builder`] - Statement rendering with bound parameters
//! - [`models`] - The `Record` trait and the shared `BaseModel` columns
//! - [`database`] - Connection management and backend aliases
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//! - [`trace`] - Statement timing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use query_action::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Debug, Default, Serialize, sqlx::FromRow)]
//! struct User {
//!     #[serde(flatten)]
//!     #[sqlx(flatten)]
//!     base: BaseModel,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn table_name() -> &'static str {
//!         "users"
//!     }
//!     fn id(&self) -> RecordId {
//!         self.base.id
//!     }
//!     fn set_id(&mut self, id: RecordId) {
//!         self.base.id = id;
//!     }
//!     fn touch(&mut self, now: chrono::DateTime<chrono::Utc>, created: bool) {
//!         self.base.touch(now, created);
//!     }
//! }
//!
//! # async fn example() -> query_action::Result<()> {
//! let config = ActionConfig::from_env()?;
//! let db = DatabaseConnection::connect(&config).await?;
//! let users = Action::<User>::with_config(db.pool().clone(), config);
//!
//! let mut ann = User { name: "ann".into(), ..User::default() };
//! users.create(&mut ann).await?;
//!
//! let found = users.first_by_id(ann.base.id, &[]).await?;
//! users.delete_by_id(ann.base.id, &[]).await?;
//! assert_eq!(users.count(&[where_id([ann.base.id])]).await?, 0);
//! # let _ = found;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and in-memory SQLite integration tests
//! ```

pub mod action;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod scopes;
pub mod trace;

pub use action::{Action, Association, AssociationKey, Order};
pub use config::ActionConfig;
pub use database::{Backend, BackendPool, DatabaseConnection};
pub use error::{ActionError, Result};
pub use models::{BaseModel, Record, RecordId};
pub use query_builder::{Direction, Page, Pagination, QueryBuilder};
pub use scopes::Scope;

/// Everything needed to define records and run actions
pub mod prelude {
    pub use crate::action::{Action, Association, AssociationKey, Order};
    pub use crate::config::ActionConfig;
    pub use crate::database::{BackendPool, DatabaseConnection};
    pub use crate::error::{ActionError, Result};
    pub use crate::models::{BaseModel, Record, RecordId};
    pub use crate::query_builder::{Direction, Join, Page, Pagination, WhereClause};
    pub use crate::scopes::{
        between_column, order_by, paginate, where_column, where_id, where_in_column,
        where_like_keyword, where_raw, with_trashed, Scope,
    };
}
