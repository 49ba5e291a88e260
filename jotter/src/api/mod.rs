//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures and body validation
//!
//! # API Structure
//!
//! - **Notes** (`/notes/`, `/notes/delete/{id}/`): the caller's notes
//! - **Users** (`/user/`, `/user/register/`): identity and sign-up
//!
//! All endpoints carry `utoipa` annotations; the rendered reference is served at
//! `/docs`.

pub mod handlers;
pub mod models;
