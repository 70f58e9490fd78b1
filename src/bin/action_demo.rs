//! # Action Demo
//!
//! Walks through the action API against the configured database: creates a
//! small `users` table, writes a few rows, pages through them, soft deletes one
//! and shows it only reappears in the trashed queries.
//!
//! ```bash
//! QUERY_ACTION_LOG_FORMAT=json DATABASE_URL=sqlite::memory: cargo run --bin action-demo
//! ```

use anyhow::Context;
use chrono::{DateTime, Utc};
use query_action::logging::init_structured_logging;
use query_action::prelude::*;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Default, Serialize, sqlx::FromRow)]
struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    base: BaseModel,
    name: String,
    age: i64,
}

impl User {
    fn new(name: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            age,
            ..Self::default()
        }
    }
}

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn id(&self) -> RecordId {
        self.base.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.base.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>, created: bool) {
        self.base.touch(now, created);
    }
}

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL,
    age INTEGER NOT NULL DEFAULT 0
)
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = ActionConfig::from_env().context("loading configuration")?;
    let db = DatabaseConnection::connect(&config)
        .await
        .context("connecting to database")?;
    anyhow::ensure!(db.health_check().await?, "database health check failed");

    sqlx::query(CREATE_USERS).execute(db.pool()).await?;

    let users = Action::<User>::with_config(db.pool().clone(), config).open_trace();

    let mut ada = User::new("ada", 36);
    users.create(&mut ada).await?;
    let mut batch = vec![
        User::new("alan", 41),
        User::new("grace", 45),
        User::new("linus", 28),
    ];
    users.batch_create(&mut batch, 0).await?;
    info!(first_id = ada.base.id, batch = batch.len(), "users created");

    let mut page = Page::new(1, 2);
    let by_age = users.clone().order("age").desc();
    let first_page = by_age.list_paged(&mut page, &[]).await?;
    info!(
        total = page.total,
        pages = page.total_pages(),
        names = ?first_page.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
        "first page"
    );

    let adults = users.count(&[between_column("age", 30, 50)]).await?;
    info!(adults, "users between 30 and 50");

    users.delete_by_id(ada.base.id, &[]).await?;
    let live = users.count(&[]).await?;
    let all = users.count_with_trashed(&[]).await?;
    info!(live, all, "after soft delete");

    let trashed = users
        .first_by_id_with_trashed(ada.base.id, &[])
        .await?
        .context("soft-deleted user should still be readable")?;
    info!(name = %trashed.name, deleted_at = trashed.base.deleted_at, "trashed user");

    users.forced_delete(&[where_like_keyword("a%", &["name"])]).await?;
    let remaining = users.count_with_trashed(&[]).await?;
    info!(remaining, "after forced delete");

    db.close().await;
    Ok(())
}
