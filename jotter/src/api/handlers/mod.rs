//! HTTP request handlers for all API endpoints.
//!
//! - [`notes`]: list, create and delete the caller's notes
//! - [`users`]: WhoAmI and anonymous account creation
//!
//! Handlers that take a [`CurrentUser`](crate::api::models::users::CurrentUser)
//! argument are authenticated; the extractor rejects the request with 401 before
//! the handler runs. Handlers return [`crate::errors::Error`], which converts to
//! the matching status code and body.

pub mod notes;
pub mod users;
