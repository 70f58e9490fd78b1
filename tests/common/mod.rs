//! Shared fixtures for the integration tests: an in-memory SQLite pool with
//! the test schema, and the records stored in it.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use query_action::prelude::*;
use query_action::Backend;
use serde::Serialize;
use sqlx::pool::PoolOptions;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at INTEGER NOT NULL DEFAULT 0,
        name TEXT NOT NULL,
        age INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE languages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at INTEGER NOT NULL DEFAULT 0,
        name TEXT NOT NULL
    )"#,
    r#"CREATE TABLE user_languages (
        user_id INTEGER NOT NULL,
        language_id INTEGER NOT NULL,
        PRIMARY KEY (user_id, language_id)
    )"#,
    r#"CREATE TABLE audit_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message TEXT NOT NULL
    )"#,
];

pub const LANGUAGES: AssociationKey =
    AssociationKey::many_to_many("Languages", "user_languages", "user_id", "language_id");

/// Single-connection in-memory database so every statement sees the same schema
pub async fn setup_pool() -> BackendPool {
    let pool = PoolOptions::<Backend>::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("schema statement should apply");
    }
    pool
}

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseModel,
    pub name: String,
    pub age: i64,
}

impl User {
    pub fn new(name: &str, age: i64) -> Self {
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

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct Language {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseModel,
    pub name: String,
}

impl Language {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Record for Language {
    fn table_name() -> &'static str {
        "languages"
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

/// Record without timestamps or soft delete
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct AuditEvent {
    pub id: i64,
    pub message: String,
}

impl Record for AuditEvent {
    fn table_name() -> &'static str {
        "audit_events"
    }

    fn soft_delete_column() -> Option<&'static str> {
        None
    }

    fn created_at_column() -> Option<&'static str> {
        None
    }

    fn updated_at_column() -> Option<&'static str> {
        None
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Insert `users` and return them with ids assigned
pub async fn seed_users(action: &Action<User>, users: &[(&str, i64)]) -> Vec<User> {
    let mut records: Vec<User> = users
        .iter()
        .map(|(name, age)| User::new(name, *age))
        .collect();
    action
        .batch_create(&mut records, 0)
        .await
        .expect("seed users");
    records
}
