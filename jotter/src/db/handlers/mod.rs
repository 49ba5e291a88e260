//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed operations
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: Account creation and identity lookup
//! - [`Notes`]: Notes, implementing the owner-scoped [`OwnedRepository`]
//!
//! # Common Pattern
//!
//! ```ignore
//! use jotter::db::handlers::{Notes, OwnedRepository};
//!
//! async fn example(pool: &sqlx::PgPool, owner: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Notes::new(&mut conn);
//!     let notes = repo.list(owner).await?;
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod repository;
pub mod users;

pub use notes::Notes;
pub use repository::OwnedRepository;
pub use users::Users;
