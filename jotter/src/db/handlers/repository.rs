//! Owner-scoped repository trait.
//!
//! A repository is a data access layer for one postgres table. Every method
//! on [`OwnedRepository`] takes the owning user's id and applies it inside the
//! SQL statement itself, so callers cannot read or remove another user's rows
//! by forgetting a permission check.

use crate::db::errors::Result;
use crate::types::UserId;

/// Repository whose rows each belong to exactly one user.
#[async_trait::async_trait]
pub trait OwnedRepository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// List every entity owned by `owner`
    async fn list(&mut self, owner: UserId) -> Result<Vec<Self::Response>>;

    /// Create a new entity owned by `owner`
    async fn create(&mut self, owner: UserId, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Delete an entity by ID if and only if it is owned by `owner`.
    ///
    /// Returns `false` when no row matched, without saying whether the id
    /// exists under another owner.
    async fn delete(&mut self, owner: UserId, id: Self::Id) -> Result<bool>;
}
