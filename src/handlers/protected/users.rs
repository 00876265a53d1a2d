// handlers/protected/users.rs - GET /users/me, PATCH /users

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::api::{FieldChecks, Validate, ValidJson};
use crate::app::AppState;
use crate::database::models::{User, UserChanges};
use crate::error::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Validate for EditUserRequest {
    type Valid = UserChanges;

    fn validate(self) -> Result<UserChanges, FieldErrors> {
        let mut checks = FieldChecks::new();
        let email = checks.non_empty("email", self.email);
        let email = checks.email("email", email);

        checks.finish(|| {
            Some(UserChanges {
                email,
                first_name: self.first_name,
                last_name: self.last_name,
            })
        })
    }
}

/// The caller's profile, as loaded by the user validation middleware.
pub async fn me_get(Extension(ValidatedUser(user)): Extension<ValidatedUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

pub async fn user_patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidJson(changes): ValidJson<EditUserRequest>,
) -> ApiResult<User> {
    let user = state.users.edit_user(auth_user.user_id, changes).await?;
    Ok(ApiResponse::success(user))
}
