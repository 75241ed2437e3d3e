//! Represents a container (media item or folder) that can be trashed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of container stored in the `entities` table.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ObjectType {
    Media,
    Document,
}

/// A lightweight view of a stored container.
///
/// Only carries what hierarchy and recycle-bin operations need; payload
/// and property data live elsewhere.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntitySlim {
    /// Unique identifier for this container.
    pub id: Uuid,

    /// Container kind; lookups are always restricted to one kind.
    pub object_type: ObjectType,

    /// Display name.
    pub name: String,

    /// Current parent. `None` means the root, or the recycle bin root
    /// when `trashed` is set.
    pub parent_id: Option<Uuid>,

    /// Soft-delete flag. Trashed containers stay retrievable by id.
    pub trashed: bool,

    /// When this container was created.
    pub created_at: DateTime<Utc>,
}
