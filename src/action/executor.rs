//! Statement execution shared by actions and associations.
//!
//! Every helper accepts any SQLx executor (pool, connection or transaction),
//! runs one statement and records it with a [`StatementTrace`].

use crate::database::{Backend, SqlBuilder};
use crate::error::Result;
use crate::models::{Record, RecordId};
use crate::trace::{StatementTrace, TraceContext};
use sqlx::Executor;

pub(crate) async fn fetch_all<'c, E, R>(
    executor: E,
    mut statement: SqlBuilder,
    context: &TraceContext,
) -> Result<Vec<R>>
where
    E: Executor<'c, Database = Backend>,
    R: Record,
{
    let trace = StatementTrace::start(context, statement.sql());
    let result = statement.build_query_as::<R>().fetch_all(executor).await;
    Ok(trace.finish(result, |rows| rows.len() as u64)?)
}

pub(crate) async fn fetch_optional<'c, E, R>(
    executor: E,
    mut statement: SqlBuilder,
    context: &TraceContext,
) -> Result<Option<R>>
where
    E: Executor<'c, Database = Backend>,
    R: Record,
{
    let trace = StatementTrace::start(context, statement.sql());
    let result = statement.build_query_as::<R>().fetch_optional(executor).await;
    Ok(trace.finish(result, |row| u64::from(row.is_some()))?)
}

/// Run a single-value integer query such as `COUNT(*)`
pub(crate) async fn fetch_count<'c, E>(
    executor: E,
    mut statement: SqlBuilder,
    context: &TraceContext,
) -> Result<i64>
where
    E: Executor<'c, Database = Backend>,
{
    let trace = StatementTrace::start(context, statement.sql());
    let result = statement
        .build_query_scalar::<i64>()
        .fetch_one(executor)
        .await;
    Ok(trace.finish(result, |_| 1)?)
}

/// Run an INSERT ... RETURNING id and collect the generated keys
pub(crate) async fn fetch_ids<'c, E>(
    executor: E,
    mut statement: SqlBuilder,
    context: &TraceContext,
) -> Result<Vec<RecordId>>
where
    E: Executor<'c, Database = Backend>,
{
    let trace = StatementTrace::start(context, statement.sql());
    let result = statement
        .build_query_scalar::<RecordId>()
        .fetch_all(executor)
        .await;
    Ok(trace.finish(result, |ids| ids.len() as u64)?)
}

/// Run a statement and return the number of affected rows
pub(crate) async fn execute<'c, E>(
    executor: E,
    mut statement: SqlBuilder,
    context: &TraceContext,
) -> Result<u64>
where
    E: Executor<'c, Database = Backend>,
{
    let trace = StatementTrace::start(context, statement.sql());
    let result = statement
        .build()
        .execute(executor)
        .await
        .map(|done| done.rows_affected());
    Ok(trace.finish(result, |rows| *rows)?)
}
