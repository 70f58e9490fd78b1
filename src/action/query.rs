use super::{executor, Action};
use crate::error::Result;
use crate::models::{Record, RecordId};
use crate::query_builder::{Direction, LimitOffset, Page, Pagination, QueryBuilder};
use crate::scopes::Scope;
use tracing::Instrument;

/// Read operations.
///
/// Every method takes extra scopes that apply after the action's own. The
/// `_with_trashed` variants include soft-deleted rows; the `_by_id` variants
/// restrict to one primary key.
impl<T: Record> Action<T> {
    /// Lowest primary key matching the scopes
    pub async fn first(&self, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("First", self.scoped(scopes), Direction::Asc)
            .await
    }

    pub async fn first_with_trashed(&self, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("FirstWithTrashed", self.scoped(scopes).unscoped(), Direction::Asc)
            .await
    }

    pub async fn first_by_id(&self, id: RecordId, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("FirstByID", self.scoped_by_id(id, scopes), Direction::Asc)
            .await
    }

    pub async fn first_by_id_with_trashed(
        &self,
        id: RecordId,
        scopes: &[Scope],
    ) -> Result<Option<T>> {
        let query = self.scoped_by_id(id, scopes).unscoped();
        self.find_one("FirstByIDWithTrashed", query, Direction::Asc)
            .await
    }

    /// Highest primary key matching the scopes
    pub async fn last(&self, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("Last", self.scoped(scopes), Direction::Desc)
            .await
    }

    pub async fn last_with_trashed(&self, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("LastWithTrashed", self.scoped(scopes).unscoped(), Direction::Desc)
            .await
    }

    pub async fn last_by_id(&self, id: RecordId, scopes: &[Scope]) -> Result<Option<T>> {
        self.find_one("LastByID", self.scoped_by_id(id, scopes), Direction::Desc)
            .await
    }

    pub async fn last_by_id_with_trashed(
        &self,
        id: RecordId,
        scopes: &[Scope],
    ) -> Result<Option<T>> {
        let query = self.scoped_by_id(id, scopes).unscoped();
        self.find_one("LastByIDWithTrashed", query, Direction::Desc)
            .await
    }

    /// All rows matching the scopes
    pub async fn list(&self, scopes: &[Scope]) -> Result<Vec<T>> {
        self.find_many::<Page>("List", self.scoped(scopes), None)
            .await
    }

    /// One page of rows; the pagination receives the total before the page is read.
    ///
    /// The page size is capped at the configured `max_page_size`.
    pub async fn list_paged<P>(&self, pagination: &mut P, scopes: &[Scope]) -> Result<Vec<T>>
    where
        P: Pagination + Send + ?Sized,
    {
        self.find_many("List", self.scoped(scopes), Some(pagination))
            .await
    }

    pub async fn list_with_trashed(&self, scopes: &[Scope]) -> Result<Vec<T>> {
        self.find_many::<Page>("ListWithTrashed", self.scoped(scopes).unscoped(), None)
            .await
    }

    pub async fn list_paged_with_trashed<P>(
        &self,
        pagination: &mut P,
        scopes: &[Scope],
    ) -> Result<Vec<T>>
    where
        P: Pagination + Send + ?Sized,
    {
        let query = self.scoped(scopes).unscoped();
        self.find_many("ListWithTrashed", query, Some(pagination))
            .await
    }

    pub async fn count(&self, scopes: &[Scope]) -> Result<i64> {
        self.count_rows("Count", self.scoped(scopes)).await
    }

    pub async fn count_with_trashed(&self, scopes: &[Scope]) -> Result<i64> {
        self.count_rows("CountWithTrashed", self.scoped(scopes).unscoped())
            .await
    }

    pub(crate) fn scoped_by_id(&self, id: RecordId, scopes: &[Scope]) -> QueryBuilder {
        self.where_pk(id).apply(self.scoped(scopes))
    }

    async fn find_one(
        &self,
        operation: &'static str,
        query: QueryBuilder,
        direction: Direction,
    ) -> Result<Option<T>> {
        let context = self.trace_context(operation);
        let statement = query
            .order_by(&self.pk_column(), direction)
            .limit(1)
            .build_select();

        executor::fetch_optional(&self.pool, statement, &context)
            .instrument(self.operation_span(operation))
            .await
    }

    async fn find_many<P>(
        &self,
        operation: &'static str,
        query: QueryBuilder,
        pagination: Option<&mut P>,
    ) -> Result<Vec<T>>
    where
        P: Pagination + Send + ?Sized,
    {
        let context = self.trace_context(operation);
        let pool = &self.pool;
        let max_page_size = u64::from(self.config.max_page_size);

        async move {
            let query = match pagination {
                Some(pagination) => {
                    let total = executor::fetch_count(pool, query.build_count(), &context).await?;
                    pagination.set_total(total);
                    query.paginate(LimitOffset::from_pagination_capped(
                        &*pagination,
                        max_page_size,
                    ))
                }
                None => query,
            };

            executor::fetch_all(pool, query.build_select(), &context).await
        }
        .instrument(self.operation_span(operation))
        .await
    }

    async fn count_rows(&self, operation: &'static str, query: QueryBuilder) -> Result<i64> {
        let context = self.trace_context(operation);
        executor::fetch_count(&self.pool, query.build_count(), &context)
            .instrument(self.operation_span(operation))
            .await
    }
}
