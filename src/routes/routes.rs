//! Defines routes for media and recycle-bin operations.
//!
//! ## Structure
//! - **Media endpoints**
//!   - `POST   /media`      — create media item
//!   - `GET    /media/{id}` — fetch media item
//!   - `DELETE /media/{id}` — move to recycle bin
//!
//! - **Recycle-bin endpoints**
//!   - `GET    /recycle-bin/media/{id}/original-parent` — resolve original parent
//!   - `POST   /recycle-bin/media/{id}/restore`         — restore item

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        media_handlers::{create_media, get_media, trash_media},
        recycle_bin_handlers::{original_parent, restore_media},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router for all routes.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Media routes
        .route("/media", post(create_media))
        .route("/media/{id}", get(get_media).delete(trash_media))
        // Recycle-bin routes
        .route(
            "/recycle-bin/media/{id}/original-parent",
            get(original_parent),
        )
        .route("/recycle-bin/media/{id}/restore", post(restore_media))
}
