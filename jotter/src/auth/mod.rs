//! Authentication for the HTTP API.
//!
//! Every note and WhoAmI route requires a bearer access token:
//!
//! ```text
//! Authorization: Bearer <jwt>
//! ```
//!
//! The token is verified against `secret_key` ([`session`]), then its subject is
//! loaded from the `users` table ([`current_user`]). Handlers take a
//! [`CurrentUser`](crate::api::models::users::CurrentUser) argument and axum runs
//! the extractor before the handler body; any failure short-circuits with 401.
//!
//! Passwords set at registration are stored as Argon2id hashes ([`password`]).

pub mod current_user;
pub mod password;
pub mod session;
