//! API request/response models for notes.

use super::validation::{as_object, check_length, required_string};
use crate::db::models::notes::{NoteCreateDBRequest, NoteDBResponse};
use crate::errors::{Error, FieldErrors, Result};
use crate::types::{NoteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Maximum title length in characters
pub const TITLE_MAX_LENGTH: usize = 100;

/// Body of `POST /notes/`. Any other keys (including `author`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteCreate {
    /// Non-blank, at most 100 characters
    pub title: String,
    /// Non-blank
    pub content: String,
}

impl NoteCreate {
    /// Validate a raw JSON body, collecting an error for every bad field.
    pub fn from_json(body: &Value) -> Result<Self> {
        let body = as_object(body)?;
        let mut errors = FieldErrors::new();

        let title = required_string(body, "title", true, &mut errors)
            .filter(|title| check_length(title, "title", None, Some(TITLE_MAX_LENGTH), &mut errors));
        let content = required_string(body, "content", true, &mut errors);

        match (title, content) {
            (Some(title), Some(content)) => Ok(Self { title, content }),
            _ => Err(Error::Validation { errors }),
        }
    }
}

impl From<NoteCreate> for NoteCreateDBRequest {
    fn from(note: NoteCreate) -> Self {
        Self {
            title: note.title,
            content: note.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Id of the user who created the note
    #[schema(value_type = String, format = "uuid")]
    pub author: UserId,
}

impl From<NoteDBResponse> for NoteResponse {
    fn from(db: NoteDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            content: db.content,
            created_at: db.created_at,
            author: db.author_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::validation::{NOT_BLANK, REQUIRED, max_length_message};
    use serde_json::json;

    fn field_errors(body: Value) -> FieldErrors {
        match NoteCreate::from_json(&body).unwrap_err() {
            Error::Validation { errors } => errors,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_note_is_trimmed() {
        let note = NoteCreate::from_json(&json!({"title": " shopping ", "content": "milk\n"})).unwrap();
        assert_eq!(note.title, "shopping");
        assert_eq!(note.content, "milk");
    }

    #[test]
    fn test_client_author_is_ignored() {
        let note = NoteCreate::from_json(&json!({
            "title": "t",
            "content": "c",
            "author": "550e8400-e29b-41d4-a716-446655440000",
            "id": "ignored",
        }))
        .unwrap();
        let db: NoteCreateDBRequest = note.into();
        assert_eq!(db.title, "t");
        assert_eq!(db.content, "c");
    }

    #[test]
    fn test_every_failing_field_reported() {
        let errors = field_errors(json!({"title": "", "content": null}));
        assert_eq!(errors.get("title"), Some(&[NOT_BLANK.to_string()][..]));
        assert!(errors.get("content").is_some());

        let errors = field_errors(json!({}));
        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("content"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_title_length_limit() {
        let ok = "a".repeat(TITLE_MAX_LENGTH);
        assert!(NoteCreate::from_json(&json!({"title": ok, "content": "c"})).is_ok());

        let long = "a".repeat(TITLE_MAX_LENGTH + 1);
        let errors = field_errors(json!({"title": long, "content": "c"}));
        assert_eq!(errors.get("title"), Some(&[max_length_message(TITLE_MAX_LENGTH)][..]));
        assert!(errors.get("content").is_none());
    }

    #[test]
    fn test_response_exposes_author() {
        let db = NoteDBResponse {
            id: uuid::Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: Utc::now(),
            author_id: uuid::Uuid::new_v4(),
        };
        let json = serde_json::to_value(NoteResponse::from(db.clone())).unwrap();
        assert_eq!(json["author"], json!(db.author_id));
        assert!(json.get("author_id").is_none());
    }
}
