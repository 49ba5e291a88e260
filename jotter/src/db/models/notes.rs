//! Database models for notes.

use crate::types::{NoteId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a note.
///
/// There is no author field: the owner is passed separately to
/// [`crate::db::handlers::OwnedRepository::create`], so a request body can
/// never carry one through.
#[derive(Debug, Clone)]
pub struct NoteCreateDBRequest {
    pub title: String,
    pub content: String,
}

/// Database response for a note
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct NoteDBResponse {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
}
