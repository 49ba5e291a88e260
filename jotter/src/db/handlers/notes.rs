//! Database repository for notes.

use crate::db::{
    errors::Result,
    handlers::repository::OwnedRepository,
    models::notes::{NoteCreateDBRequest, NoteDBResponse},
};
use crate::types::{NoteId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

pub struct Notes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Notes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> OwnedRepository for Notes<'c> {
    type CreateRequest = NoteCreateDBRequest;
    type Response = NoteDBResponse;
    type Id = NoteId;

    // Ordered by creation time with the id as tie-breaker, so repeated reads see the same sequence.
    #[instrument(skip(self), fields(owner = %abbrev_uuid(&owner)), err)]
    async fn list(&mut self, owner: UserId) -> Result<Vec<Self::Response>> {
        let notes = sqlx::query_as::<_, NoteDBResponse>(
            r#"
            SELECT id, title, content, created_at, author_id
            FROM notes
            WHERE author_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(notes)
    }

    #[instrument(skip(self, request), fields(owner = %abbrev_uuid(&owner)), err)]
    async fn create(&mut self, owner: UserId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let note_id = Uuid::new_v4();

        let note = sqlx::query_as::<_, NoteDBResponse>(
            r#"
            INSERT INTO notes (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, created_at, author_id
            "#,
        )
        .bind(note_id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(owner)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(note)
    }

    #[instrument(skip(self), fields(owner = %abbrev_uuid(&owner), note_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, owner: UserId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
