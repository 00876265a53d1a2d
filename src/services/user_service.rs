use std::sync::Arc;
use tracing::instrument;

use super::ServiceError;
use crate::database::models::{User, UserChanges};
use crate::database::UserStore;
use crate::types::UserId;

/// Profile reads and edits for the authenticated user
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn find(&self, user_id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_by_id(user_id).await?)
    }

    #[instrument(skip(self, changes))]
    pub async fn edit_user(&self, user_id: UserId, changes: UserChanges) -> Result<User, ServiceError> {
        self.store
            .update(user_id, changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {user_id}")))
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}
