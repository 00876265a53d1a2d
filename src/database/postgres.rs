use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Bookmark, BookmarkChanges, NewBookmark, NewUser, User, UserChanges};
use crate::database::repository::{BookmarkStore, UserStore};
use crate::types::{BookmarkId, UserId};

const USER_COLUMNS: &str = "id, created_at, updated_at, email, hash, first_name, last_name";
const BOOKMARK_COLUMNS: &str = "id, created_at, updated_at, title, description, link, user_id";

/// Postgres-backed implementation of both stores, sharing one pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl BookmarkStore for PgStore {
    async fn list(&self, owner: UserId) -> Result<Vec<Bookmark>, DatabaseError> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookmarks)
    }

    async fn insert(&self, owner: UserId, new_bookmark: NewBookmark) -> Result<Bookmark, DatabaseError> {
        let bookmark = sqlx::query_as::<_, Bookmark>(&format!(
            r#"
            INSERT INTO bookmarks (title, description, link, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {BOOKMARK_COLUMNS}
            "#
        ))
        .bind(&new_bookmark.title)
        .bind(&new_bookmark.description)
        .bind(&new_bookmark.link)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(bookmark)
    }

    async fn find(&self, owner: UserId, id: BookmarkId) -> Result<Option<Bookmark>, DatabaseError> {
        let bookmark = sqlx::query_as::<_, Bookmark>(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bookmark)
    }

    async fn update(
        &self,
        owner: UserId,
        id: BookmarkId,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, DatabaseError> {
        let bookmark = sqlx::query_as::<_, Bookmark>(&format!(
            r#"
            UPDATE bookmarks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                link = COALESCE($5, link),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {BOOKMARK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.link)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bookmark)
    }

    async fn delete(&self, owner: UserId, id: BookmarkId) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
