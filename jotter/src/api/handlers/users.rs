use crate::{
    AppState,
    api::models::users::{CurrentUser, DUPLICATE_USERNAME, RegisterRequest, UserResponse},
    auth::password::{self, Argon2Params},
    db::{
        errors::DbError,
        handlers::{Users, users::USERNAME_UNIQUE_CONSTRAINT},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, FieldErrors, NON_FIELD_ERRORS, Result},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

/// Get the authenticated user.
#[utoipa::path(
    get,
    path = "/user/",
    tag = "users",
    summary = "Who am I",
    description = "Return the id and username of the user the bearer token belongs to",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("BearerAuth" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(current_user: CurrentUser) -> Json<UserResponse> {
    Json(current_user.into())
}

/// Create an account. Open to anonymous callers.
#[utoipa::path(
    post,
    path = "/user/register/",
    tag = "users",
    summary = "Register",
    description = "Create a new account from a username and password",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid input, duplicate username, or registration disabled"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if !state.config.auth.allow_registration {
        return Err(Error::Validation {
            errors: FieldErrors::single(NON_FIELD_ERRORS, "User registration is disabled"),
        });
    }

    let Json(body) = payload?;
    let policy = &state.config.auth.password;
    let request = RegisterRequest::from_json(&body, policy)?;

    // Hash the password on a blocking thread to avoid blocking async runtime
    let params = Argon2Params::from(policy);
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Users::new(&mut conn);

    // The unique constraint decides races between concurrent sign-ups for the same name
    let created = repo
        .create(&UserCreateDBRequest {
            username: request.username,
            password_hash,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation_on(USERNAME_UNIQUE_CONSTRAINT) {
                Error::Validation {
                    errors: FieldErrors::single("username", DUPLICATE_USERNAME),
                }
            } else {
                Error::Database(e)
            }
        })?;

    tracing::info!(user_id = %created.id, "Registered new user");
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}
