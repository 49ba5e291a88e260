//! Database record models matching table schemas.
//!
//! These structs are what repositories accept and return. They are kept
//! separate from the API models in [`crate::api::models`] so the storage and
//! wire representations can evolve independently; in particular
//! [`users::UserDBResponse`] carries the password hash, which no API model does.
//!
//! - [`users`]: User accounts and credentials
//! - [`notes`]: Notes owned by a single user

pub mod notes;
pub mod users;
