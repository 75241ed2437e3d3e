//! Represents a directed, kind-tagged link between two containers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded relation between two containers.
///
/// At most one relation of the parent-on-delete kind is expected per child.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// Parent side of the relation.
    pub parent_id: Uuid,

    /// Child side of the relation.
    pub child_id: Uuid,

    /// Relation kind (e.g. "relateParentMediaFolderOnDelete").
    pub relation_type_alias: String,

    /// When the relation was recorded.
    pub created_at: DateTime<Utc>,
}
