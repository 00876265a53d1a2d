use std::sync::Arc;
use tracing::instrument;

use super::ServiceError;
use crate::database::models::{Bookmark, BookmarkChanges, NewBookmark};
use crate::database::BookmarkStore;
use crate::types::{BookmarkId, UserId};

/// Per-user bookmark CRUD.
///
/// Every operation takes the caller's [`UserId`]; a bookmark that belongs to
/// someone else is reported exactly like one that does not exist.
#[derive(Clone)]
pub struct BookmarkService {
    store: Arc<dyn BookmarkStore>,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    pub async fn list_bookmarks(&self, user_id: UserId) -> Result<Vec<Bookmark>, ServiceError> {
        Ok(self.store.list(user_id).await?)
    }

    #[instrument(skip(self, new_bookmark))]
    pub async fn create_bookmark(
        &self,
        user_id: UserId,
        new_bookmark: NewBookmark,
    ) -> Result<Bookmark, ServiceError> {
        let bookmark = self.store.insert(user_id, new_bookmark).await?;
        tracing::info!(bookmark_id = %bookmark.id, "Bookmark created");
        Ok(bookmark)
    }

    pub async fn get_bookmark_by_id(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
    ) -> Result<Bookmark, ServiceError> {
        self.store
            .find(user_id, bookmark_id)
            .await?
            .ok_or_else(|| not_found(bookmark_id))
    }

    #[instrument(skip(self, changes))]
    pub async fn edit_bookmark_by_id(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
        changes: BookmarkChanges,
    ) -> Result<Bookmark, ServiceError> {
        self.store
            .update(user_id, bookmark_id, changes)
            .await?
            .ok_or_else(|| not_found(bookmark_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_bookmark_by_id(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
    ) -> Result<(), ServiceError> {
        if self.store.delete(user_id, bookmark_id).await? {
            tracing::info!("Bookmark deleted");
            Ok(())
        } else {
            Err(not_found(bookmark_id))
        }
    }
}

fn not_found(bookmark_id: BookmarkId) -> ServiceError {
    ServiceError::NotFound(format!("Bookmark {bookmark_id}"))
}
