// handlers/protected/bookmarks.rs - Bookmark CRUD for the authenticated user
//
// GET    /bookmarks      → list the caller's bookmarks
// POST   /bookmarks      → create one (201)
// GET    /bookmarks/:id  → fetch one
// PATCH  /bookmarks/:id  → partial edit
// DELETE /bookmarks/:id  → delete (204)
//
// Bookmarks owned by someone else answer 404, same as missing ones.

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::api::{ApiPath, FieldChecks, Validate, ValidJson};
use crate::app::AppState;
use crate::database::models::{Bookmark, BookmarkChanges, NewBookmark};
use crate::error::{ApiError, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::types::BookmarkId;

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl Validate for CreateBookmarkRequest {
    type Valid = NewBookmark;

    fn validate(self) -> Result<NewBookmark, FieldErrors> {
        let mut checks = FieldChecks::new();
        let title = checks.required("title", self.title);
        let link = checks.required("link", self.link);

        checks.finish(|| {
            Some(NewBookmark {
                title: title?,
                description: self.description,
                link: link?,
            })
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EditBookmarkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl Validate for EditBookmarkRequest {
    type Valid = BookmarkChanges;

    fn validate(self) -> Result<BookmarkChanges, FieldErrors> {
        let mut checks = FieldChecks::new();
        let title = checks.non_empty("title", self.title);
        let link = checks.non_empty("link", self.link);

        checks.finish(|| {
            Some(BookmarkChanges {
                title,
                description: self.description,
                link,
            })
        })
    }
}

/// Ids outside the column's range cannot name a stored bookmark.
fn bookmark_id(id: i64) -> Result<BookmarkId, ApiError> {
    BookmarkId::try_from(id).map_err(|_| ApiError::not_found(format!("Bookmark {id} not found")))
}

pub async fn bookmarks_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Bookmark>> {
    let bookmarks = state.bookmarks.list_bookmarks(auth_user.user_id).await?;
    Ok(ApiResponse::success(bookmarks))
}

pub async fn bookmarks_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidJson(new_bookmark): ValidJson<CreateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let bookmark = state
        .bookmarks
        .create_bookmark(auth_user.user_id, new_bookmark)
        .await?;
    Ok(ApiResponse::created(bookmark))
}

pub async fn bookmark_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Bookmark> {
    let bookmark = state
        .bookmarks
        .get_bookmark_by_id(auth_user.user_id, bookmark_id(id)?)
        .await?;
    Ok(ApiResponse::success(bookmark))
}

pub async fn bookmark_patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(changes): ValidJson<EditBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let bookmark = state
        .bookmarks
        .edit_bookmark_by_id(auth_user.user_id, bookmark_id(id)?, changes)
        .await?;
    Ok(ApiResponse::success(bookmark))
}

pub async fn bookmark_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    state
        .bookmarks
        .delete_bookmark_by_id(auth_user.user_id, bookmark_id(id)?)
        .await?;
    Ok(ApiResponse::no_content())
}
