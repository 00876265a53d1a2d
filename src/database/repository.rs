use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Bookmark, BookmarkChanges, NewBookmark, NewUser, User, UserChanges};
use crate::types::{BookmarkId, UserId};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email is reported as [`DatabaseError::UniqueViolation`].
    async fn insert(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError>;

    /// Apply the supplied fields and bump `updated_at`. `None` if the user is gone.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DatabaseError>;

    /// Liveness probe for `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Persistence for bookmarks, always scoped to an owner.
///
/// No method addresses a bookmark by id alone; one that belongs to someone
/// else looks exactly like one that does not exist.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// All bookmarks of `owner`, oldest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Bookmark>, DatabaseError>;

    async fn insert(&self, owner: UserId, new_bookmark: NewBookmark) -> Result<Bookmark, DatabaseError>;

    async fn find(&self, owner: UserId, id: BookmarkId) -> Result<Option<Bookmark>, DatabaseError>;

    /// Apply the supplied fields and bump `updated_at`. `None` if absent or not owned.
    async fn update(
        &self,
        owner: UserId,
        id: BookmarkId,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, DatabaseError>;

    /// `true` if a row was removed.
    async fn delete(&self, owner: UserId, id: BookmarkId) -> Result<bool, DatabaseError>;
}
