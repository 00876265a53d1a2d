use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{BookmarkId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
}

/// Partial bookmark update; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct BookmarkChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl BookmarkChanges {
    /// Apply the supplied fields to `bookmark` in place.
    pub fn apply_to(self, bookmark: &mut Bookmark) {
        if let Some(title) = self.title {
            bookmark.title = title;
        }
        if let Some(description) = self.description {
            bookmark.description = Some(description);
        }
        if let Some(link) = self.link {
            bookmark.link = link;
        }
    }
}
