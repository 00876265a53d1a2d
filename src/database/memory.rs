//! In-process store with the same semantics as the postgres backend.
//!
//! Selected with `DATABASE_BACKEND=memory`. Nothing survives a restart, which
//! makes it handy for local runs and for the test suite.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Bookmark, BookmarkChanges, NewBookmark, NewUser, User, UserChanges};
use crate::database::repository::{BookmarkStore, UserStore};
use crate::types::{BookmarkId, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    bookmarks: BTreeMap<BookmarkId, Bookmark>,
    next_user_id: i32,
    next_bookmark_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&new_user.email, None) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.next_user_id),
            created_at: now,
            updated_at: now,
            email: new_user.email,
            hash: new_user.hash,
            first_name: None,
            last_name: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = Some(last_name);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn list(&self, owner: UserId) -> Result<Vec<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookmarks
            .values()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, owner: UserId, new_bookmark: NewBookmark) -> Result<Bookmark, DatabaseError> {
        let mut tables = self.tables.write().await;
        // Mirrors the foreign key on bookmarks.user_id.
        if !tables.users.contains_key(&owner) {
            return Err(DatabaseError::ForeignKeyViolation("bookmarks_user_id_fkey".to_string()));
        }

        tables.next_bookmark_id += 1;
        let now = Utc::now();
        let bookmark = Bookmark {
            id: BookmarkId::new(tables.next_bookmark_id),
            created_at: now,
            updated_at: now,
            title: new_bookmark.title,
            description: new_bookmark.description,
            link: new_bookmark.link,
            user_id: owner,
        };
        tables.bookmarks.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    async fn find(&self, owner: UserId, id: BookmarkId) -> Result<Option<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookmarks
            .get(&id)
            .filter(|b| b.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: UserId,
        id: BookmarkId,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(bookmark) = tables.bookmarks.get_mut(&id).filter(|b| b.user_id == owner) else {
            return Ok(None);
        };

        changes.apply_to(bookmark);
        bookmark.updated_at = Utc::now();
        Ok(Some(bookmark.clone()))
    }

    async fn delete(&self, owner: UserId, id: BookmarkId) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = tables.bookmarks.get(&id).is_some_and(|b| b.user_id == owner);
        if owned {
            tables.bookmarks.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            hash: "hash".to_string(),
        }
    }

    fn new_bookmark(title: &str) -> NewBookmark {
        NewBookmark {
            title: title.to_string(),
            description: None,
            link: "example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        UserStore::insert(&store, new_user("a@example.com")).await.unwrap();

        let err = UserStore::insert(&store, new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_lists_in_insertion_order() {
        let store = MemoryStore::new();
        let owner = UserStore::insert(&store, new_user("a@example.com")).await.unwrap().id;

        let first = BookmarkStore::insert(&store, owner, new_bookmark("first")).await.unwrap();
        let second = BookmarkStore::insert(&store, owner, new_bookmark("second")).await.unwrap();
        assert!(first.id < second.id);

        let titles: Vec<_> = store.list(owner).await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn insert_for_unknown_owner_fails() {
        let store = MemoryStore::new();
        let err = BookmarkStore::insert(&store, UserId::new(42), new_bookmark("orphan")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn foreign_bookmarks_are_invisible() {
        let store = MemoryStore::new();
        let alice = UserStore::insert(&store, new_user("alice@example.com")).await.unwrap().id;
        let bob = UserStore::insert(&store, new_user("bob@example.com")).await.unwrap().id;
        let bookmark = BookmarkStore::insert(&store, alice, new_bookmark("mine")).await.unwrap();

        assert!(store.find(bob, bookmark.id).await.unwrap().is_none());
        assert!(BookmarkStore::update(&store, bob, bookmark.id, BookmarkChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(bob, bookmark.id).await.unwrap());
        assert!(store.find(alice, bookmark.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn email_change_to_taken_address_fails() {
        let store = MemoryStore::new();
        UserStore::insert(&store, new_user("alice@example.com")).await.unwrap();
        let bob = UserStore::insert(&store, new_user("bob@example.com")).await.unwrap().id;

        let changes = UserChanges {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        let err = UserStore::update(&store, bob, changes).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }
}
