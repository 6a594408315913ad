use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::models::User;
use crate::error::ApiError;
use crate::metis::MetisError;
use crate::server::AppState;

/// The caller loaded from persistence, with groups and authorities
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that loads the user named in the JWT claims.
/// Tokens for unknown users, or whose login no longer matches, are rejected.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = match state.answer_posts.current_user(auth_user.user_id).await {
        Ok(user) => user,
        Err(MetisError::NotFound(_)) => {
            tracing::warn!(
                "User validation failed: user '{}' (ID: {}) not found",
                auth_user.login,
                auth_user.user_id
            );
            return Err(ApiError::forbidden(format!("User '{}' is not active", auth_user.login)));
        }
        Err(other) => return Err(other.into()),
    };

    if user.login != auth_user.login {
        tracing::warn!(
            "User validation failed: JWT user '{}' doesn't match stored login '{}'",
            auth_user.login,
            user.login
        );
        return Err(ApiError::forbidden("User authentication mismatch"));
    }

    tracing::debug!("User validation successful: {} ({})", user.login, user.id);

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
