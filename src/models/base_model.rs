use super::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Common columns for soft-deletable tables.
///
/// Embed with `#[serde(flatten)]` and `#[sqlx(flatten)]`:
///
/// ```rust
/// use query_action::models::BaseModel;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize, sqlx::FromRow)]
/// struct User {
///     #[serde(flatten)]
///     #[sqlx(flatten)]
///     base: BaseModel,
///     name: String,
/// }
/// ```
///
/// `deleted_at` holds the unix seconds of the soft delete; `0` marks a live row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BaseModel {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: i64,
}

impl BaseModel {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at != 0
    }

    /// Stamp timestamps; `created_at` is only filled on creation when unset
    pub fn touch(&mut self, now: DateTime<Utc>, created: bool) {
        if created && self.created_at.timestamp() == 0 {
            self.created_at = now;
        }
        self.updated_at = now;
    }
}
