//! Many-to-many association management through a join table.
//!
//! An [`Association`] is bound to one persisted owner and edits the rows of
//! the join table named by an [`AssociationKey`]. Targets must already be
//! persisted; only their primary keys are used.

use super::{executor, Action};
use crate::error::{ActionError, Result};
use crate::models::{Record, RecordId};
use crate::query_builder::{qualified, InsertStatement, QueryBuilder};
use crate::scopes::{apply_scopes, Scope};
use crate::trace::TraceContext;
use serde_json::Value;
use tracing::Instrument;

/// Describes a join table linking owners to targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationKey {
    pub name: &'static str,
    pub join_table: &'static str,
    /// Join-table column holding the owner's id
    pub foreign_key: &'static str,
    /// Join-table column holding the target's id
    pub association_foreign_key: &'static str,
}

impl AssociationKey {
    pub const fn many_to_many(
        name: &'static str,
        join_table: &'static str,
        foreign_key: &'static str,
        association_foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            join_table,
            foreign_key,
            association_foreign_key,
        }
    }
}

/// Association operations for one owner record
#[derive(Debug)]
pub struct Association<'a, T: Record> {
    action: &'a Action<T>,
    owner_id: RecordId,
}

impl<'a, T: Record> Association<'a, T> {
    pub(crate) fn new(action: &'a Action<T>, owner: &T) -> Result<Self> {
        match owner.id() {
            0 => Err(ActionError::MissingPrimaryKey {
                table: action.table_name().to_string(),
            }),
            owner_id => Ok(Self { action, owner_id }),
        }
    }

    pub fn owner_id(&self) -> RecordId {
        self.owner_id
    }

    /// Link `targets` to the owner; pairs that already exist are kept as they are
    pub async fn append<R: Record>(&self, key: &AssociationKey, targets: &[R]) -> Result<u64> {
        let target_ids = target_ids(targets)?;
        let context = self.context("AssociationAppend", key);

        let Some(statement) = self.link_statement(key, &target_ids) else {
            return Ok(0);
        };
        executor::execute(self.action.pool(), statement.build(), &context)
            .instrument(self.action.operation_span("AssociationAppend"))
            .await
    }

    /// Make `targets` the owner's complete set of links, atomically
    pub async fn replace<R: Record>(&self, key: &AssociationKey, targets: &[R]) -> Result<u64> {
        let target_ids = target_ids(targets)?;
        let context = self.context("AssociationReplace", key);
        let pool = self.action.pool();

        async move {
            let mut tx = pool.begin().await?;
            executor::execute(&mut *tx, self.owner_links(key).build_delete(), &context).await?;
            let linked = match self.link_statement(key, &target_ids) {
                Some(statement) => executor::execute(&mut *tx, statement.build(), &context).await?,
                None => 0,
            };
            tx.commit().await?;
            Ok::<u64, ActionError>(linked)
        }
        .instrument(self.action.operation_span("AssociationReplace"))
        .await
    }

    /// Unlink `targets` from the owner
    pub async fn delete<R: Record>(&self, key: &AssociationKey, targets: &[R]) -> Result<u64> {
        let target_ids = target_ids(targets)?;
        if target_ids.is_empty() {
            return Ok(0);
        }
        let statement = self
            .owner_links(key)
            .where_in(
                key.association_foreign_key,
                target_ids.into_iter().map(Value::from).collect(),
            )
            .build_delete();

        let context = self.context("AssociationDelete", key);
        executor::execute(self.action.pool(), statement, &context)
            .instrument(self.action.operation_span("AssociationDelete"))
            .await
    }

    /// Remove every link of the owner
    pub async fn clear(&self, key: &AssociationKey) -> Result<u64> {
        let context = self.context("AssociationClear", key);
        executor::execute(
            self.action.pool(),
            self.owner_links(key).build_delete(),
            &context,
        )
        .instrument(self.action.operation_span("AssociationClear"))
        .await
    }

    /// Number of live targets linked to the owner
    pub async fn count<R: Record>(&self, key: &AssociationKey) -> Result<i64> {
        let context = self.context("AssociationCount", key);
        executor::fetch_count(
            self.action.pool(),
            self.targets::<R>(key).build_count(),
            &context,
        )
        .instrument(self.action.operation_span("AssociationCount"))
        .await
    }

    /// Load the live targets linked to the owner, narrowed by `scopes`
    pub async fn find<R: Record>(&self, key: &AssociationKey, scopes: &[Scope]) -> Result<Vec<R>> {
        let query = apply_scopes(self.targets::<R>(key), scopes);
        let context = self.context("AssociationFind", key);
        executor::fetch_all(self.action.pool(), query.build_select(), &context)
            .instrument(self.action.operation_span("AssociationFind"))
            .await
    }

    fn context(&self, operation: &'static str, key: &AssociationKey) -> TraceContext {
        TraceContext::new(
            operation,
            key.join_table,
            self.action.config().slow_statement_threshold(),
        )
    }

    /// Join-table rows belonging to the owner
    fn owner_links(&self, key: &AssociationKey) -> QueryBuilder {
        QueryBuilder::new(key.join_table).where_eq(key.foreign_key, self.owner_id)
    }

    fn link_statement(
        &self,
        key: &AssociationKey,
        target_ids: &[RecordId],
    ) -> Option<InsertStatement> {
        if target_ids.is_empty() {
            return None;
        }
        let columns = vec![
            key.foreign_key.to_string(),
            key.association_foreign_key.to_string(),
        ];
        let statement = target_ids.iter().fold(
            InsertStatement::new(key.join_table, columns).on_conflict_do_nothing(),
            |statement, target_id| {
                statement.row(vec![Value::from(self.owner_id), Value::from(*target_id)])
            },
        );
        Some(statement)
    }

    /// Target table joined to the owner's links
    fn targets<R: Record>(&self, key: &AssociationKey) -> QueryBuilder {
        let on_condition = format!(
            "{} = {}",
            qualified(R::table_name(), R::primary_key()),
            qualified(key.join_table, key.association_foreign_key),
        );
        QueryBuilder::new(R::table_name())
            .soft_delete(R::soft_delete_column())
            .inner_join(key.join_table, &on_condition)
            .where_eq(&qualified_raw(key.join_table, key.foreign_key), self.owner_id)
    }
}

fn target_ids<R: Record>(targets: &[R]) -> Result<Vec<RecordId>> {
    targets
        .iter()
        .map(|target| match target.id() {
            0 => Err(ActionError::MissingPrimaryKey {
                table: R::table_name().to_string(),
            }),
            id => Ok(id),
        })
        .collect()
}

/// `table.column` unquoted, for APIs that quote it themselves
fn qualified_raw(table: &str, column: &str) -> String {
    format!("{table}.{column}")
}
