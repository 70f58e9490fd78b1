use super::Action;
use crate::models::Record;
use crate::query_builder::Direction;
use crate::scopes::order_by;

/// ORDER BY builder returned by [`Action::order`].
///
/// Choosing a direction appends `ORDER BY column ASC|DESC` to the action and
/// hands it back for further chaining. Several orders apply in the sequence
/// they were added.
#[derive(Debug)]
pub struct Order<T: Record> {
    column: String,
    direction: Direction,
    action: Action<T>,
}

impl<T: Record> Order<T> {
    pub(crate) fn new(column: &str, action: Action<T>) -> Self {
        Self {
            column: column.to_string(),
            direction: Direction::Asc,
            action,
        }
    }

    pub fn asc(self) -> Action<T> {
        self.finish(Direction::Asc)
    }

    pub fn desc(self) -> Action<T> {
        self.finish(Direction::Desc)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn finish(mut self, direction: Direction) -> Action<T> {
        self.direction = direction;
        let scope = order_by(&self.column, self.direction);
        self.action.scopes(vec![scope])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::BackendPool;
    use crate::models::{BaseModel, RecordId};
    use serde::Serialize;

    #[derive(Debug, Serialize, sqlx::FromRow)]
    struct Post {
        #[serde(flatten)]
        #[sqlx(flatten)]
        base: BaseModel,
        title: String,
    }

    impl Record for Post {
        fn table_name() -> &'static str {
            "posts"
        }

        fn soft_delete_column() -> Option<&'static str> {
            None
        }

        fn id(&self) -> RecordId {
            self.base.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.base.id = id;
        }
    }

    fn lazy_pool() -> BackendPool {
        sqlx::pool::PoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy pool")
    }

    #[tokio::test]
    async fn test_order_defaults_and_column() {
        let order = Action::<Post>::new(lazy_pool()).order("title");
        assert_eq!(order.column(), "title");
        assert_eq!(order.direction(), Direction::Asc);
    }

    #[tokio::test]
    async fn test_orders_chain_in_sequence() {
        let action = Action::<Post>::new(lazy_pool())
            .order("title")
            .desc()
            .order("id")
            .asc();

        assert_eq!(
            action.query().build_sql(),
            "SELECT * FROM \"posts\" ORDER BY \"title\" DESC, \"id\" ASC"
        );
    }
}
