//! Recycle-bin queries: find where a trashed media item originally lived.
//!
//! When an item is moved to the recycle bin, a relation of the configured
//! "parent on delete" kind is recorded from its previous parent to the
//! item. [`RecycleBinQueryService::original_parent`] reads that relation
//! back and reports whether the recorded parent can still take the item.

use crate::{
    models::entity::{EntitySlim, ObjectType},
    services::lookup::{EntityLookup, QueryResult, ReadScope, RelationIndex, ScopeProvider},
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Result of an original-parent lookup.
///
/// `Success` and `ParentUnavailable` are both partial or full successes:
/// the original location is known. The remaining variants mean it is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "parent", rename_all = "camelCase")]
pub enum ResolutionOutcome {
    /// The recorded parent exists and is not trashed.
    Success(EntitySlim),
    /// No container of the expected kind has this id.
    NotFound,
    /// The container exists but is not in the recycle bin.
    NotTrashed,
    /// No parent-on-delete relation was ever recorded for the container.
    NoParentRelation,
    /// A parent was recorded but is gone (`None`) or itself trashed.
    ParentUnavailable(Option<EntitySlim>),
}

impl ResolutionOutcome {
    /// The resolved parent, present only for `Success` and a
    /// `ParentUnavailable` whose parent still exists.
    pub fn parent(&self) -> Option<&EntitySlim> {
        match self {
            Self::Success(parent) => Some(parent),
            Self::ParentUnavailable(parent) => parent.as_ref(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NotFound => "notFound",
            Self::NotTrashed => "notTrashed",
            Self::NoParentRelation => "noParentRelation",
            Self::ParentUnavailable(_) => "parentUnavailable",
        }
    }
}

/// Answers recycle-bin questions for one container kind.
#[derive(Clone)]
pub struct RecycleBinQueryService<P> {
    scopes: P,
    object_type: ObjectType,
    parent_relation_alias: String,
}

impl<P: ScopeProvider> RecycleBinQueryService<P> {
    /// Query service for media items, matching relations tagged
    /// `parent_relation_alias`.
    pub fn new(scopes: P, parent_relation_alias: impl Into<String>) -> Self {
        Self {
            scopes,
            object_type: ObjectType::Media,
            parent_relation_alias: parent_relation_alias.into(),
        }
    }

    /// Resolve the folder `trashed_id` was in before it was trashed.
    ///
    /// Expected conditions come back as [`ResolutionOutcome`] variants;
    /// only storage faults are returned as errors. The read scope is
    /// released on every path.
    pub async fn original_parent(&self, trashed_id: Uuid) -> QueryResult<ResolutionOutcome> {
        let mut scope = self.scopes.create_scope().await?;
        let outcome = self.resolve_in(&mut scope, trashed_id).await?;
        scope.complete().await?;

        debug!(
            "original parent of {} => {}{}",
            trashed_id,
            outcome.as_str(),
            outcome
                .parent()
                .map(|p| format!(" ({})", p.id))
                .unwrap_or_default()
        );
        Ok(outcome)
    }

    async fn resolve_in(
        &self,
        scope: &mut P::Scope,
        trashed_id: Uuid,
    ) -> QueryResult<ResolutionOutcome> {
        let Some(entity) = scope.get(trashed_id, self.object_type).await? else {
            return Ok(ResolutionOutcome::NotFound);
        };

        if !entity.trashed {
            return Ok(ResolutionOutcome::NotTrashed);
        }

        // First match wins if the one-per-child invariant was ever broken.
        let relation = scope
            .relations_by_child(entity.id)
            .await?
            .into_iter()
            .find(|r| r.relation_type_alias == self.parent_relation_alias);

        let Some(relation) = relation else {
            return Ok(ResolutionOutcome::NoParentRelation);
        };

        match scope.get(relation.parent_id, self.object_type).await? {
            Some(parent) if !parent.trashed => Ok(ResolutionOutcome::Success(parent)),
            parent => Ok(ResolutionOutcome::ParentUnavailable(parent)),
        }
    }
}
