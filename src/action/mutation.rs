use super::{executor, Action};
use crate::error::{ActionError, Result};
use crate::models::record::{column_values, is_zero};
use crate::models::{Record, RecordId};
use crate::query_builder::{InsertStatement, QueryBuilder};
use crate::scopes::Scope;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, Instrument};

/// Write operations.
///
/// UPDATE and DELETE statements must carry at least one WHERE condition from
/// the record's primary key, the action's clauses or the given scopes; the
/// soft-delete filter alone does not count. Joins only shape reads and are
/// not rendered into writes.
impl<T: Record> Action<T> {
    /// Insert one record and write the generated primary key back
    pub async fn create(&self, record: &mut T) -> Result<()> {
        record.touch(Utc::now(), true);
        let assign_ids = record.id() == 0;
        let statement = self.insert_statement([&*record], assign_ids)?;
        let context = self.trace_context("Create");

        let ids = executor::fetch_ids(&self.pool, statement.build(), &context)
            .instrument(self.operation_span("Create"))
            .await?;

        if assign_ids {
            if let Some(id) = ids.first() {
                record.set_id(*id);
            }
        }
        Ok(())
    }

    /// Insert records in chunks of `batch_size` rows inside one transaction.
    ///
    /// A `batch_size` of zero uses the configured default. Within a chunk,
    /// records that carry a primary key are inserted with it; the others get
    /// generated keys, written back in the order `RETURNING` yields them.
    /// SQLite does not guarantee that order, but for a single multi-row
    /// `INSERT ... VALUES` it follows the VALUES list.
    pub async fn batch_create(&self, records: &mut [T], batch_size: usize) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let batch_size = if batch_size == 0 {
            self.config.batch_size
        } else {
            batch_size
        };

        let now = Utc::now();
        for record in records.iter_mut() {
            record.touch(now, true);
        }

        let context = self.trace_context("BatchCreate");
        let pool = &self.pool;

        async move {
            let mut tx = pool.begin().await?;
            for chunk in records.chunks_mut(batch_size) {
                let (explicit, generated): (Vec<usize>, Vec<usize>) =
                    (0..chunk.len()).partition(|&index| chunk[index].id() != 0);

                if !explicit.is_empty() {
                    let statement =
                        self.insert_statement(explicit.iter().map(|&index| &chunk[index]), false)?;
                    executor::fetch_ids(&mut *tx, statement.build(), &context).await?;
                }
                if !generated.is_empty() {
                    let statement =
                        self.insert_statement(generated.iter().map(|&index| &chunk[index]), true)?;
                    let ids = executor::fetch_ids(&mut *tx, statement.build(), &context).await?;
                    for (index, id) in generated.into_iter().zip(ids) {
                        chunk[index].set_id(id);
                    }
                }
            }
            tx.commit().await?;
            debug!(table = %context.table, rows = records.len(), "batch create committed");
            Ok::<(), ActionError>(())
        }
        .instrument(self.operation_span("BatchCreate"))
        .await
    }

    /// Update the record's non-zero fields.
    ///
    /// The primary key and creation timestamp are never written; `updated_at`
    /// is stamped. When the record has a primary key the update is restricted
    /// to it.
    pub async fn update(&self, record: &mut T, scopes: &[Scope]) -> Result<u64> {
        self.update_record("Update", record, self.scoped(scopes))
            .await
    }

    /// Update exactly the given columns, stamping `updated_at` unless provided
    pub async fn update_map(&self, values: Map<String, Value>, scopes: &[Scope]) -> Result<u64> {
        self.update_columns("UpdateMap", values, self.scoped(scopes))
            .await
    }

    pub async fn update_by_id(
        &self,
        id: RecordId,
        record: &mut T,
        scopes: &[Scope],
    ) -> Result<u64> {
        self.update_record("UpdateByID", record, self.scoped_by_id(id, scopes))
            .await
    }

    pub async fn update_map_by_id(
        &self,
        id: RecordId,
        values: Map<String, Value>,
        scopes: &[Scope],
    ) -> Result<u64> {
        self.update_columns("UpdateMapByID", values, self.scoped_by_id(id, scopes))
            .await
    }

    /// Delete matching rows; soft delete when the record has a tombstone column
    pub async fn delete(&self, scopes: &[Scope]) -> Result<u64> {
        self.delete_rows("Delete", self.scoped(scopes)).await
    }

    pub async fn delete_by_id(&self, id: RecordId, scopes: &[Scope]) -> Result<u64> {
        self.delete_rows("DeleteByID", self.scoped_by_id(id, scopes))
            .await
    }

    /// Physically delete matching rows, trashed ones included
    pub async fn forced_delete(&self, scopes: &[Scope]) -> Result<u64> {
        self.delete_rows("ForcedDelete", self.scoped(scopes).unscoped())
            .await
    }

    pub async fn forced_delete_by_id(&self, id: RecordId, scopes: &[Scope]) -> Result<u64> {
        let query = self.scoped_by_id(id, scopes).unscoped();
        self.delete_rows("ForcedDeleteByID", query).await
    }

    /// INSERT for `records`; with `assign_ids` the primary key is left to the database
    fn insert_statement<'r>(
        &self,
        records: impl IntoIterator<Item = &'r T>,
        assign_ids: bool,
    ) -> Result<InsertStatement> {
        let table = self.table_name();
        let pk = T::primary_key();

        let mut rows = Vec::new();
        for record in records {
            let mut columns = column_values(record, table)?;
            if assign_ids {
                columns.remove(pk);
            }
            rows.push(columns);
        }

        let column_names: Vec<String> = rows
            .first()
            .map(|columns| columns.keys().cloned().collect())
            .unwrap_or_default();

        let mut statement = InsertStatement::new(table, column_names.clone()).returning(pk);
        for mut columns in rows {
            statement.push_row(
                column_names
                    .iter()
                    .map(|name| columns.remove(name).unwrap_or(Value::Null))
                    .collect(),
            );
        }
        Ok(statement)
    }

    async fn update_record(
        &self,
        operation: &'static str,
        record: &mut T,
        query: QueryBuilder,
    ) -> Result<u64> {
        record.touch(Utc::now(), false);
        let mut columns = column_values(record, self.table_name())?;
        columns.remove(T::primary_key());
        if let Some(created_at) = T::created_at_column() {
            columns.remove(created_at);
        }

        let assignments: Vec<(String, Value)> = columns
            .into_iter()
            .filter(|(_, value)| !is_zero(value))
            .collect();

        let query = match record.id() {
            0 => query,
            id => self.where_pk(id).apply(query),
        };
        self.run_update(operation, query, assignments).await
    }

    async fn update_columns(
        &self,
        operation: &'static str,
        mut values: Map<String, Value>,
        query: QueryBuilder,
    ) -> Result<u64> {
        if let Some(updated_at) = T::updated_at_column() {
            if !values.is_empty() && !values.contains_key(updated_at) {
                values.insert(updated_at.to_string(), serde_json::to_value(Utc::now())?);
            }
        }
        self.run_update(operation, query, values.into_iter().collect())
            .await
    }

    async fn run_update(
        &self,
        operation: &'static str,
        query: QueryBuilder,
        assignments: Vec<(String, Value)>,
    ) -> Result<u64> {
        ensure_conditions(&query, "update")?;
        if assignments.is_empty() {
            debug!(table = %self.table_name(), operation, "nothing to update");
            return Ok(0);
        }

        let context = self.trace_context(operation);
        executor::execute(&self.pool, query.build_update(&assignments), &context)
            .instrument(self.operation_span(operation))
            .await
    }

    async fn delete_rows(&self, operation: &'static str, query: QueryBuilder) -> Result<u64> {
        ensure_conditions(&query, "delete")?;

        let statement = match query.soft_delete_filter() {
            Some(column) => {
                let tombstone = vec![(column.to_string(), Value::from(Utc::now().timestamp()))];
                query.build_update(&tombstone)
            }
            None => query.build_delete(),
        };

        let context = self.trace_context(operation);
        executor::execute(&self.pool, statement, &context)
            .instrument(self.operation_span(operation))
            .await
    }
}

fn ensure_conditions(query: &QueryBuilder, operation: &'static str) -> Result<()> {
    if query.has_conditions() {
        Ok(())
    } else {
        Err(ActionError::MissingWhereClause {
            operation,
            table: query.table().to_string(),
        })
    }
}
