use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    db::{errors::DbError, handlers::Users},
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument, trace};

/// Pull the bearer token out of the Authorization header.
/// Returns:
/// - None: no Authorization header, or a scheme other than Bearer
/// - Some(token): the raw token, which may still be invalid
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            trace!("No bearer credentials found in request");
            return Err(Error::Unauthenticated { message: None });
        };

        let claims = session::verify_access_token(token, &state.config)?;

        // The token only names the user; the account must still exist.
        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let user = Users::new(&mut conn).get_by_id(claims.sub).await?;

        match user {
            Some(user) => {
                debug!("Found bearer authenticated user: {}", user.id);
                Ok(CurrentUser {
                    id: user.id,
                    username: user.username,
                })
            }
            None => {
                trace!("Token subject {} has no account", claims.sub);
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
