//! # Database Operations
//!
//! Connection management and the backend aliases every other module builds on.
//!
//! The crate talks to a single SQLx backend. Statements are assembled with
//! [`SqlBuilder`] so placeholders follow the backend's syntax, and all reads
//! decode into records through [`BackendRow`].

pub mod connection;

pub use connection::DatabaseConnection;

/// SQLx database driver used by actions
pub type Backend = sqlx::Sqlite;

/// Connection pool for [`Backend`]
pub type BackendPool = sqlx::Pool<Backend>;

/// Row type records are decoded from
pub type BackendRow = <Backend as sqlx::Database>::Row;

/// Statement builder with owned bind arguments
pub type SqlBuilder = sqlx::QueryBuilder<'static, Backend>;
