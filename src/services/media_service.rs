//! MediaService: create, trash, and restore media items.
//!
//! Trashing records a parent-on-delete relation from the item's previous
//! parent, which is what recycle-bin queries read back. Every write runs
//! in one SQLite transaction.

use crate::{
    models::entity::{EntitySlim, ObjectType},
    services::scope::fetch_entity,
};
use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media `{0}` not found")]
    NotFound(Uuid),
    #[error("parent `{0}` not found")]
    ParentNotFound(Uuid),
    #[error("parent `{0}` is in the recycle bin")]
    ParentTrashed(Uuid),
    #[error("media `{0}` is already in the recycle bin")]
    AlreadyTrashed(Uuid),
    #[error("media `{0}` is not in the recycle bin")]
    NotTrashed(Uuid),
    #[error("invalid media name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Clone)]
pub struct MediaService {
    /// Shared SQLite connection pool.
    db: Arc<SqlitePool>,

    /// Alias written for parent-on-delete relations.
    parent_relation_alias: String,
}

impl MediaService {
    pub fn new(db: Arc<SqlitePool>, parent_relation_alias: impl Into<String>) -> Self {
        Self {
            db,
            parent_relation_alias: parent_relation_alias.into(),
        }
    }

    /// Create a media item under `parent_id`, or at the root.
    ///
    /// The parent must be an existing, non-trashed media item.
    pub async fn create(&self, name: &str, parent_id: Option<Uuid>) -> MediaResult<EntitySlim> {
        ensure_name_valid(name)?;
        let mut tx = self.begin_write().await?;

        if let Some(parent_id) = parent_id {
            ensure_live_parent(&mut tx, parent_id).await?;
        }

        let entity = EntitySlim {
            id: Uuid::new_v4(),
            object_type: ObjectType::Media,
            name: name.to_string(),
            parent_id,
            trashed: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO entities (id, object_type, name, parent_id, trashed, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id)
        .bind(entity.object_type)
        .bind(&entity.name)
        .bind(entity.parent_id)
        .bind(entity.trashed)
        .bind(entity.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(entity)
    }

    /// Fetch a media item, trashed or not.
    pub async fn get(&self, id: Uuid) -> MediaResult<EntitySlim> {
        let mut conn = self.db.acquire().await?;
        fetch_entity(&mut conn, id, ObjectType::Media)
            .await?
            .ok_or(MediaError::NotFound(id))
    }

    /// Move an item and everything below it to the recycle bin.
    ///
    /// - Replaces any earlier parent-on-delete relation for the item
    /// - Records the previous parent, unless the item was at the root
    /// - Flags the whole subtree trashed and detaches the item
    pub async fn move_to_recycle_bin(&self, id: Uuid) -> MediaResult<EntitySlim> {
        let mut tx = self.begin_write().await?;
        let entity = fetch_entity(&mut tx, id, ObjectType::Media)
            .await?
            .ok_or(MediaError::NotFound(id))?;

        if entity.trashed {
            return Err(MediaError::AlreadyTrashed(id));
        }

        self.delete_parent_relations(&mut tx, id).await?;

        if let Some(parent_id) = entity.parent_id {
            sqlx::query(
                "INSERT INTO relations (id, parent_id, child_id, relation_type_alias, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4())
            .bind(parent_id)
            .bind(id)
            .bind(&self.parent_relation_alias)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let flagged = set_subtree_trashed(&mut tx, id, true).await?;
        sqlx::query("UPDATE entities SET parent_id = NULL WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let trashed = fetch_entity(&mut tx, id, ObjectType::Media)
            .await?
            .ok_or(MediaError::NotFound(id))?;
        tx.commit().await?;

        info!(
            "moved media {} to recycle bin ({} entities, previous parent {:?})",
            id, flagged, entity.parent_id
        );
        Ok(trashed)
    }

    /// Restore a trashed item and its subtree under `target_id`, or the root.
    ///
    /// Clears the item's parent-on-delete relations.
    pub async fn restore(&self, id: Uuid, target_id: Option<Uuid>) -> MediaResult<EntitySlim> {
        let mut tx = self.begin_write().await?;
        let entity = fetch_entity(&mut tx, id, ObjectType::Media)
            .await?
            .ok_or(MediaError::NotFound(id))?;

        if !entity.trashed {
            return Err(MediaError::NotTrashed(id));
        }

        if let Some(target_id) = target_id {
            ensure_live_parent(&mut tx, target_id).await?;
        }

        let restored_count = set_subtree_trashed(&mut tx, id, false).await?;
        sqlx::query("UPDATE entities SET parent_id = ? WHERE id = ?")
            .bind(target_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        self.delete_parent_relations(&mut tx, id).await?;

        let restored = fetch_entity(&mut tx, id, ObjectType::Media)
            .await?
            .ok_or(MediaError::NotFound(id))?;
        tx.commit().await?;

        info!(
            "restored media {} under {:?} ({} entities)",
            id, target_id, restored_count
        );
        Ok(restored)
    }

    /// Open a write transaction holding the write lock from its first
    /// statement. A deferred transaction that reads first cannot upgrade
    /// while another writer holds the lock, and SQLite fails it at once
    /// instead of waiting on the busy timeout.
    async fn begin_write(&self) -> MediaResult<Transaction<'static, Sqlite>> {
        Ok(self.db.begin_with("BEGIN IMMEDIATE").await?)
    }

    async fn delete_parent_relations(
        &self,
        conn: &mut SqliteConnection,
        child_id: Uuid,
    ) -> MediaResult<u64> {
        let result =
            sqlx::query("DELETE FROM relations WHERE child_id = ? AND relation_type_alias = ?")
                .bind(child_id)
                .bind(&self.parent_relation_alias)
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }
}

/// Reject blank, padded, or overlong names.
fn ensure_name_valid(name: &str) -> MediaResult<()> {
    if name.trim().is_empty() {
        return Err(MediaError::InvalidName("must not be blank".into()));
    }
    if name.trim() != name {
        return Err(MediaError::InvalidName(
            "cannot begin or end with whitespace".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(MediaError::InvalidName(format!(
            "must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

async fn ensure_live_parent(conn: &mut SqliteConnection, parent_id: Uuid) -> MediaResult<()> {
    match fetch_entity(conn, parent_id, ObjectType::Media).await? {
        None => Err(MediaError::ParentNotFound(parent_id)),
        Some(parent) if parent.trashed => Err(MediaError::ParentTrashed(parent_id)),
        Some(_) => Ok(()),
    }
}

/// Set `trashed` on `root_id` and all of its descendants.
async fn set_subtree_trashed(
    conn: &mut SqliteConnection,
    root_id: Uuid,
    trashed: bool,
) -> MediaResult<u64> {
    let result = sqlx::query(
        "WITH RECURSIVE subtree(id) AS (
             SELECT ?
             UNION ALL
             SELECT e.id FROM entities e JOIN subtree s ON e.parent_id = s.id
         )
         UPDATE entities SET trashed = ? WHERE id IN (SELECT id FROM subtree)",
    )
    .bind(root_id)
    .bind(trashed)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{file_pool, test_pool},
        services::{
            recycle_bin_query_service::{RecycleBinQueryService, ResolutionOutcome},
            scope::SqliteScopeProvider,
        },
    };

    const ALIAS: &str = "relateParentMediaFolderOnDelete";

    /// Outcome name plus resolved parent id, ignoring timestamp precision.
    fn summary(outcome: &ResolutionOutcome) -> (&'static str, Option<Uuid>) {
        (outcome.as_str(), outcome.parent().map(|p| p.id))
    }

    async fn setup() -> (
        MediaService,
        RecycleBinQueryService<SqliteScopeProvider>,
    ) {
        let db = Arc::new(test_pool().await);
        (
            MediaService::new(db.clone(), ALIAS),
            RecycleBinQueryService::new(SqliteScopeProvider::new(db), ALIAS),
        )
    }

    #[tokio::test]
    async fn trashing_records_the_original_parent() {
        let (media, bin) = setup().await;
        let folder = media.create("Photos", None).await.unwrap();
        let item = media.create("beach.jpg", Some(folder.id)).await.unwrap();

        let trashed = media.move_to_recycle_bin(item.id).await.unwrap();
        assert!(trashed.trashed);
        assert_eq!(trashed.parent_id, None);

        let outcome = bin.original_parent(item.id).await.unwrap();
        assert_eq!(summary(&outcome), ("success", Some(folder.id)));
    }

    #[tokio::test]
    async fn root_level_item_has_no_parent_relation() {
        let (media, bin) = setup().await;
        let item = media.create("root.png", None).await.unwrap();
        media.move_to_recycle_bin(item.id).await.unwrap();

        assert_eq!(
            bin.original_parent(item.id).await.unwrap(),
            ResolutionOutcome::NoParentRelation
        );
    }

    #[tokio::test]
    async fn trashing_the_parent_makes_it_unavailable() {
        let (media, bin) = setup().await;
        let folder = media.create("Photos", None).await.unwrap();
        let item = media.create("beach.jpg", Some(folder.id)).await.unwrap();
        media.move_to_recycle_bin(item.id).await.unwrap();
        let trashed_folder = media.move_to_recycle_bin(folder.id).await.unwrap();

        let outcome = bin.original_parent(item.id).await.unwrap();
        assert_eq!(
            summary(&outcome),
            ("parentUnavailable", Some(trashed_folder.id))
        );
        assert!(outcome.parent().unwrap().trashed);
    }

    #[tokio::test]
    async fn trashing_a_folder_trashes_descendants() {
        let (media, bin) = setup().await;
        let folder = media.create("Photos", None).await.unwrap();
        let nested = media.create("2025", Some(folder.id)).await.unwrap();
        let item = media.create("beach.jpg", Some(nested.id)).await.unwrap();

        media.move_to_recycle_bin(folder.id).await.unwrap();

        let item = media.get(item.id).await.unwrap();
        assert!(item.trashed);
        assert_eq!(item.parent_id, Some(nested.id));
        assert_eq!(
            bin.original_parent(nested.id).await.unwrap(),
            ResolutionOutcome::NoParentRelation
        );
    }

    #[tokio::test]
    async fn trashing_twice_is_rejected() {
        let (media, _) = setup().await;
        let item = media.create("a.png", None).await.unwrap();
        media.move_to_recycle_bin(item.id).await.unwrap();

        let err = media.move_to_recycle_bin(item.id).await.unwrap_err();
        assert!(matches!(err, MediaError::AlreadyTrashed(id) if id == item.id));
    }

    #[tokio::test]
    async fn restore_clears_flags_and_relation() {
        let (media, bin) = setup().await;
        let folder = media.create("Photos", None).await.unwrap();
        let item = media.create("album", Some(folder.id)).await.unwrap();
        let child = media.create("beach.jpg", Some(item.id)).await.unwrap();
        media.move_to_recycle_bin(item.id).await.unwrap();

        let restored = media.restore(item.id, Some(folder.id)).await.unwrap();
        assert!(!restored.trashed);
        assert_eq!(restored.parent_id, Some(folder.id));
        assert!(!media.get(child.id).await.unwrap().trashed);
        assert_eq!(
            bin.original_parent(item.id).await.unwrap(),
            ResolutionOutcome::NotTrashed
        );

        // A second trip through the bin records a fresh relation.
        media.move_to_recycle_bin(item.id).await.unwrap();
        let outcome = bin.original_parent(item.id).await.unwrap();
        assert_eq!(summary(&outcome), ("success", Some(folder.id)));
    }

    #[tokio::test]
    async fn restore_into_trashed_target_is_rejected() {
        let (media, _) = setup().await;
        let folder = media.create("Photos", None).await.unwrap();
        let item = media.create("beach.jpg", None).await.unwrap();
        media.move_to_recycle_bin(folder.id).await.unwrap();
        media.move_to_recycle_bin(item.id).await.unwrap();

        let err = media.restore(item.id, Some(folder.id)).await.unwrap_err();
        assert!(matches!(err, MediaError::ParentTrashed(_)));
        assert!(media.get(item.id).await.unwrap().trashed);
    }

    #[tokio::test]
    async fn restore_of_live_item_is_rejected() {
        let (media, _) = setup().await;
        let item = media.create("beach.jpg", None).await.unwrap();
        let err = media.restore(item.id, None).await.unwrap_err();
        assert!(matches!(err, MediaError::NotTrashed(_)));
    }

    #[tokio::test]
    async fn create_validates_name_and_parent() {
        let (media, _) = setup().await;
        assert!(matches!(
            media.create("  ", None).await.unwrap_err(),
            MediaError::InvalidName(_)
        ));
        assert!(matches!(
            media.create(" padded", None).await.unwrap_err(),
            MediaError::InvalidName(_)
        ));
        assert!(matches!(
            media.create("a.png", Some(Uuid::new_v4())).await.unwrap_err(),
            MediaError::ParentNotFound(_)
        ));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (media, _) = setup().await;
        let id = Uuid::new_v4();
        assert!(matches!(
            media.get(id).await.unwrap_err(),
            MediaError::NotFound(missing) if missing == id
        ));
    }

    async fn setup_on_file(
        dir: &std::path::Path,
    ) -> (
        MediaService,
        RecycleBinQueryService<SqliteScopeProvider>,
    ) {
        let db = Arc::new(file_pool(dir).await);
        (
            MediaService::new(db.clone(), ALIAS),
            RecycleBinQueryService::new(SqliteScopeProvider::new(db), ALIAS),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_trash_calls_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let (media, bin) = setup_on_file(dir.path()).await;
        let folder = media.create("Photos", None).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..40 {
            let item = media
                .create(&format!("img-{}.jpg", i), Some(folder.id))
                .await
                .unwrap();
            ids.push(item.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let media = media.clone();
                tokio::spawn(async move { media.move_to_recycle_bin(id).await })
            })
            .collect();

        for handle in handles {
            let trashed = handle.await.unwrap().unwrap();
            assert!(trashed.trashed);
        }

        for id in ids {
            let outcome = bin.original_parent(id).await.unwrap();
            assert_eq!(summary(&outcome), ("success", Some(folder.id)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn resolves_run_alongside_trash_calls() {
        let dir = tempfile::tempdir().unwrap();
        let (media, bin) = setup_on_file(dir.path()).await;
        let folder = media.create("Photos", None).await.unwrap();
        let resolved = media.create("first.jpg", Some(folder.id)).await.unwrap();
        media.move_to_recycle_bin(resolved.id).await.unwrap();
        let resolved_id = resolved.id;

        let mut pending = Vec::new();
        for i in 0..20 {
            pending.push(
                media
                    .create(&format!("img-{}.jpg", i), Some(folder.id))
                    .await
                    .unwrap()
                    .id,
            );
        }

        let trashes: Vec<_> = pending
            .iter()
            .map(|&id| {
                let media = media.clone();
                tokio::spawn(async move { media.move_to_recycle_bin(id).await })
            })
            .collect();
        let resolves: Vec<_> = (0..20)
            .map(|_| {
                let bin = bin.clone();
                tokio::spawn(async move { bin.original_parent(resolved_id).await })
            })
            .collect();

        for handle in trashes {
            handle.await.unwrap().unwrap();
        }
        for handle in resolves {
            let outcome = handle.await.unwrap().unwrap();
            assert_eq!(summary(&outcome), ("success", Some(folder.id)));
        }
    }
}
