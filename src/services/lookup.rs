//! Read-side collaborator interfaces used by recycle-bin queries.
//!
//! A query opens a [`ReadScope`] from a [`ScopeProvider`], performs its
//! lookups through it, and completes it. Dropping a scope without
//! completing it releases it as well, so early returns and `?` never leak
//! a unit of work.

use crate::models::{
    entity::{EntitySlim, ObjectType},
    relation::Relation,
};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Fault raised by the storage layer underneath a lookup.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Resolves containers by identifier and kind.
#[async_trait]
pub trait EntityLookup: Send {
    /// Returns `None` when no container of `object_type` has this id.
    /// Trashed containers are returned with `trashed` set.
    async fn get(&mut self, id: Uuid, object_type: ObjectType)
    -> QueryResult<Option<EntitySlim>>;
}

/// Maps a child identifier to the relations recorded against it.
#[async_trait]
pub trait RelationIndex: Send {
    /// All relations of any kind whose child is `child_id`. Order is
    /// whatever the index yields.
    async fn relations_by_child(&mut self, child_id: Uuid) -> QueryResult<Vec<Relation>>;
}

/// A unit of work spanning a set of lookups.
#[async_trait]
pub trait ReadScope: EntityLookup + RelationIndex + Sized {
    /// Release the scope after a successful read.
    async fn complete(self) -> QueryResult<()>;
}

/// Hands out read scopes.
#[async_trait]
pub trait ScopeProvider: Send + Sync {
    type Scope: ReadScope;

    async fn create_scope(&self) -> QueryResult<Self::Scope>;
}
