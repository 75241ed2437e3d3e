//! Shared state handed to every handler.

use crate::services::{
    media_service::MediaService, recycle_bin_query_service::RecycleBinQueryService,
    scope::SqliteScopeProvider,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub media: MediaService,
    pub recycle_bin: RecycleBinQueryService<SqliteScopeProvider>,
}

impl AppState {
    /// Wire services over one pool, sharing the parent-on-delete alias.
    pub fn new(db: Arc<SqlitePool>, parent_relation_alias: &str) -> Self {
        Self {
            media: MediaService::new(db.clone(), parent_relation_alias),
            recycle_bin: RecycleBinQueryService::new(
                SqliteScopeProvider::new(db.clone()),
                parent_relation_alias,
            ),
            db,
        }
    }
}
