//! # Query Builder System
//!
//! Statement assembly for actions, rendered onto [`sqlx::QueryBuilder`] so
//! every value travels as a bind parameter.
//!
//! ## Key Components
//!
//! - [`builder`] - SELECT/COUNT/UPDATE/DELETE rendering with soft-delete filtering
//! - [`conditions`] - WHERE conditions and grouped clauses
//! - [`joins`] - JOIN clause management (INNER, LEFT, CROSS)
//! - [`pagination`] - Page objects and LIMIT/OFFSET windows
//! - [`insert`] - Multi-row INSERT statements
//! - [`ident`] - Identifier quoting
//!
//! ## Example Usage
//!
//! ```rust
//! use query_action::query_builder::{LimitOffset, QueryBuilder};
//!
//! let query = QueryBuilder::new("users")
//!     .soft_delete(Some("deleted_at"))
//!     .where_eq("name", "ann")
//!     .order_desc("id")
//!     .paginate(LimitOffset::page(2, 20));
//!
//! assert_eq!(
//!     query.build_sql(),
//!     "SELECT * FROM \"users\" WHERE \"name\" = ? AND \"deleted_at\" = 0 \
//!      ORDER BY \"id\" DESC LIMIT 20 OFFSET 20"
//! );
//! ```

pub mod builder;
pub mod conditions;
pub mod ident;
pub mod insert;
pub mod joins;
pub mod pagination;

pub use builder::{Direction, QueryBuilder};
pub use conditions::{bind_value, Condition, LogicalOperator, WhereClause};
pub use ident::{qualified, quote_ident};
pub use insert::InsertStatement;
pub use joins::{Join, JoinType};
pub use pagination::{LimitOffset, Page, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
