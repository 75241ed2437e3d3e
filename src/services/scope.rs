//! SQLite-backed read scopes.
//!
//! Each scope wraps one `sqlx` transaction. `complete` commits it; dropping
//! it uncompleted rolls it back.

use crate::{
    models::{
        entity::{EntitySlim, ObjectType},
        relation::Relation,
    },
    services::lookup::{EntityLookup, QueryResult, ReadScope, RelationIndex, ScopeProvider},
};
use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteScopeProvider {
    db: Arc<SqlitePool>,
}

impl SqliteScopeProvider {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

pub struct SqliteReadScope {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl ScopeProvider for SqliteScopeProvider {
    type Scope = SqliteReadScope;

    async fn create_scope(&self) -> QueryResult<SqliteReadScope> {
        let tx = self.db.begin().await?;
        Ok(SqliteReadScope { tx })
    }
}

#[async_trait]
impl EntityLookup for SqliteReadScope {
    async fn get(
        &mut self,
        id: Uuid,
        object_type: ObjectType,
    ) -> QueryResult<Option<EntitySlim>> {
        Ok(fetch_entity(&mut self.tx, id, object_type).await?)
    }
}

#[async_trait]
impl RelationIndex for SqliteReadScope {
    async fn relations_by_child(&mut self, child_id: Uuid) -> QueryResult<Vec<Relation>> {
        Ok(fetch_relations_by_child(&mut self.tx, child_id).await?)
    }
}

#[async_trait]
impl ReadScope for SqliteReadScope {
    async fn complete(self) -> QueryResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Fetch one container of the given kind, trashed or not.
pub(crate) async fn fetch_entity(
    conn: &mut SqliteConnection,
    id: Uuid,
    object_type: ObjectType,
) -> Result<Option<EntitySlim>, sqlx::Error> {
    sqlx::query_as::<_, EntitySlim>(
        "SELECT id, object_type, name, parent_id, trashed, created_at
         FROM entities WHERE id = ? AND object_type = ?",
    )
    .bind(id)
    .bind(object_type)
    .fetch_optional(conn)
    .await
}

/// Fetch every relation recorded for `child_id`, in insertion order.
pub(crate) async fn fetch_relations_by_child(
    conn: &mut SqliteConnection,
    child_id: Uuid,
) -> Result<Vec<Relation>, sqlx::Error> {
    sqlx::query_as::<_, Relation>(
        "SELECT id, parent_id, child_id, relation_type_alias, created_at
         FROM relations WHERE child_id = ? ORDER BY rowid",
    )
    .bind(child_id)
    .fetch_all(conn)
    .await
}
