use chrono::Duration;
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::database::models::NewUser;
use crate::database::{MemoryStore, UserStore};
use crate::services::{AuthService, BookmarkService, UserService};
use crate::types::UserId;

/// Services wired to a fresh in-memory store
pub struct TestContext {
    pub store: MemoryStore,
    pub keys: JwtKeys,
    pub auth: AuthService,
    pub users: UserService,
    pub bookmarks: BookmarkService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let keys = JwtKeys::new("test-secret", Duration::minutes(15)).expect("non-empty secret");
        let shared = Arc::new(store.clone());

        Self {
            auth: AuthService::new(shared.clone(), keys.clone()),
            users: UserService::new(shared.clone()),
            bookmarks: BookmarkService::new(shared),
            store,
            keys,
        }
    }

    /// Insert a user directly, skipping password hashing.
    pub async fn create_user(&self, email: &str) -> UserId {
        let new_user = NewUser {
            email: email.to_string(),
            hash: "unused".to_string(),
        };
        UserStore::insert(&self.store, new_user)
            .await
            .expect("insert test user")
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contexts_do_not_share_state() {
        let first = TestContext::new();
        let second = TestContext::new();

        let id = first.create_user("shared@example.com").await;
        assert!(second.users.find(id).await.unwrap().is_none());
        // Same email is free in the other context.
        second.create_user("shared@example.com").await;
    }
}
