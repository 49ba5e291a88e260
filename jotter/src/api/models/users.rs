//! API request/response models for users.

use super::validation::{as_object, check_length, required_string};
use crate::config::PasswordConfig;
use crate::db::models::users::UserDBResponse;
use crate::errors::{Error, FieldErrors, Result};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Maximum username length in characters
pub const USERNAME_MAX_LENGTH: usize = 150;

pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// The authenticated identity for a request, resolved from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

impl From<UserDBResponse> for CurrentUser {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username,
        }
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        CurrentUser::from(db).into()
    }
}

/// Body of `POST /user/register/`
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// At most 150 characters: letters, digits and `@ . + - _`
    pub username: String,
    #[schema(format = "password")]
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

impl RegisterRequest {
    /// Validate a raw JSON body against the configured password policy.
    ///
    /// The username is trimmed; the password is kept exactly as sent.
    pub fn from_json(body: &Value, policy: &PasswordConfig) -> Result<Self> {
        let body = as_object(body)?;
        let mut errors = FieldErrors::new();

        let username = required_string(body, "username", true, &mut errors).filter(|username| {
            if !check_length(username, "username", None, Some(USERNAME_MAX_LENGTH), &mut errors) {
                return false;
            }
            if !is_valid_username(username) {
                errors.add("username", INVALID_USERNAME);
                return false;
            }
            true
        });
        let password = required_string(body, "password", false, &mut errors)
            .filter(|password| check_length(password, "password", Some(policy.min_length), Some(policy.max_length), &mut errors));

        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(Error::Validation { errors }),
        }
    }
}
