use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use super::ServiceError;
use crate::auth::{hash_password, verify_password, JwtKeys};
use crate::database::models::NewUser;
use crate::database::UserStore;
use crate::types::UserId;

/// Verified against on sign-in for unknown emails, so both failures cost one hash check.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("bookmark-api-unknown-user").ok());

/// Email/password pair from a sign-up or sign-in body
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Account creation and sign-in, issuing JWT access tokens
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    #[instrument(name = "AuthService: signup", skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signup(&self, credentials: Credentials) -> Result<AccessToken, ServiceError> {
        let Credentials { email, password } = credentials;

        // Hashing is CPU-bound, so it runs on the blocking pool.
        let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = self.users.insert(NewUser { email, hash }).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.sign_token(&user.email, user.id)
    }

    #[instrument(name = "AuthService: signin", skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signin(&self, credentials: Credentials) -> Result<AccessToken, ServiceError> {
        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            let password = credentials.password;
            tokio::task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
                Some(hash) => verify_password(&password, hash).map(|_| ()),
                None => Ok(()),
            })
            .await??;
            tracing::warn!("Sign-in failed: user not found");
            return Err(ServiceError::CredentialsIncorrect);
        };

        let stored_hash = user.hash.clone();
        let password = credentials.password;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await??;
        if !matches {
            tracing::warn!("Sign-in failed: wrong password");
            return Err(ServiceError::CredentialsIncorrect);
        }

        tracing::info!(user_id = %user.id, "User authenticated");
        self.sign_token(&user.email, user.id)
    }

    fn sign_token(&self, email: &str, user_id: UserId) -> Result<AccessToken, ServiceError> {
        let access_token = self.keys.issue(user_id, email)?;
        Ok(AccessToken { access_token })
    }
}
