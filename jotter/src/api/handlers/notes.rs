use crate::{
    AppState,
    api::models::{
        notes::{NoteCreate, NoteResponse},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{Notes, OwnedRepository},
        models::notes::NoteCreateDBRequest,
    },
    errors::{Error, Result},
    types::NoteId,
};
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

/// List the caller's notes, oldest first.
#[utoipa::path(
    get,
    path = "/notes/",
    tag = "notes",
    summary = "List notes",
    description = "List every note authored by the current user, ordered by creation time",
    responses(
        (status = 200, description = "The caller's notes", body = [NoteResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(
        ("BearerAuth" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_notes(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<NoteResponse>>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Notes::new(&mut conn);

    let notes = repo.list(current_user.id).await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// Create a note owned by the caller.
///
/// Any `author` in the body is ignored.
#[utoipa::path(
    post,
    path = "/notes/",
    tag = "notes",
    summary = "Create note",
    description = "Create a note authored by the current user",
    request_body = NoteCreate,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Invalid input, with messages keyed by field"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(
        ("BearerAuth" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_note(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let Json(body) = payload?;
    let request: NoteCreateDBRequest = NoteCreate::from_json(&body)?.into();

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Notes::new(&mut conn);

    let note = repo.create(current_user.id, &request).await?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

/// Delete one of the caller's notes.
///
/// A note owned by someone else gets the same 404 as one that never existed.
#[utoipa::path(
    delete,
    path = "/notes/delete/{id}/",
    tag = "notes",
    summary = "Delete note",
    description = "Delete a note authored by the current user",
    params(
        ("id" = uuid::Uuid, Path, description = "Note ID to delete"),
    ),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(
        ("BearerAuth" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id, note_id = %id))]
pub async fn delete_note(State(state): State<AppState>, Path(id): Path<String>, current_user: CurrentUser) -> Result<StatusCode> {
    let not_found = || Error::NotFound {
        resource: "Note".to_string(),
        id: id.clone(),
    };

    // An id that is not a UUID cannot name a note
    let note_id: NoteId = id.parse().map_err(|_| not_found())?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Notes::new(&mut conn);

    if repo.delete(current_user.id, note_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
