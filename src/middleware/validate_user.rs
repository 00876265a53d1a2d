use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;

/// User row loaded for the bearer of a verified token
#[derive(Clone, Debug)]
pub struct ValidatedUser(pub User);

/// Middleware that checks the token's user still exists.
/// Must run after [`super::jwt_auth_middleware`].
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

    let user = state.users.find(auth_user.user_id).await?.ok_or_else(|| {
        tracing::warn!("User validation failed: user {} from token no longer exists", auth_user.user_id);
        ApiError::unauthorized("User no longer exists")
    })?;

    tracing::debug!("User validation successful: {} ({})", user.email, user.id);

    request.extensions_mut().insert(ValidatedUser(user));

    Ok(next.run(request).await)
}
