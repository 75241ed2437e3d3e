//! Core data models for the media recycle bin.
//!
//! Entities are the media items and folders that can be trashed; relations
//! are the side table used to remember where a trashed item came from.
//! Both map to database tables via `sqlx::FromRow` and serialize as JSON
//! via `serde`.

pub mod entity;
pub mod relation;
