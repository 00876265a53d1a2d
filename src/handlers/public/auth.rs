// handlers/public/auth.rs - POST /auth/signup, POST /auth/signin

use axum::extract::State;
use serde::Deserialize;

use crate::api::{FieldChecks, Validate, ValidJson};
use crate::app::AppState;
use crate::error::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccessToken, Credentials};

/// Body shared by sign-up and sign-in.
///
/// ```json
/// { "email": "duy0209@gmail.com", "password": "test1234" }
/// ```
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for AuthRequest {
    type Valid = Credentials;

    fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut checks = FieldChecks::new();
        let email = checks.required("email", self.email);
        let email = checks.email("email", email);
        let password = checks.required("password", self.password);

        checks.finish(|| {
            Some(Credentials {
                email: email?,
                password: password?,
            })
        })
    }
}

/// Create an account and return an access token (201).
pub async fn signup_post(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<AuthRequest>,
) -> ApiResult<AccessToken> {
    let token = state.auth.signup(credentials).await?;
    Ok(ApiResponse::created(token))
}

/// Exchange credentials for an access token (200).
pub async fn signin_post(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<AuthRequest>,
) -> ApiResult<AccessToken> {
    let token = state.auth.signin(credentials).await?;
    Ok(ApiResponse::success(token))
}
