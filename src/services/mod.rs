pub mod auth_service;
pub mod bookmark_service;
pub mod user_service;

pub use auth_service::{AccessToken, AuthService, Credentials};
pub use bookmark_service::BookmarkService;
pub use user_service::UserService;

use crate::auth::{JwtError, PasswordError};
use crate::database::DatabaseError;
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Credentials taken")]
    CredentialsTaken,

    #[error("Credentials incorrect")]
    CredentialsIncorrect,

    #[error(transparent)]
    Database(DatabaseError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(_) => ServiceError::CredentialsTaken,
            other => ServiceError::Database(other),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => ApiError::not_found(format!("{what} not found")),
            ServiceError::CredentialsTaken => ApiError::forbidden("Credentials taken"),
            ServiceError::CredentialsIncorrect => ApiError::forbidden("Credentials incorrect"),
            ServiceError::Database(e) => e.into(),
            ServiceError::Token(e) => e.into(),
            ServiceError::Password(e) => e.into(),
            ServiceError::Task(e) => {
                tracing::error!("Blocking task failed: {}", e);
                ApiError::internal_server_error("An unexpected error occurred")
            }
        }
    }
}
