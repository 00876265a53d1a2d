/// Shared identifier types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user row.
///
/// Every bookmark store operation takes one of these as its owner scope. Outside
/// the storage layer a `UserId` only comes from a verified access token, so a
/// handler cannot reach bookmarks without naming whose they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(i32);

impl UserId {
    pub(crate) fn new(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a bookmark row, as taken from the `/bookmarks/:id` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct BookmarkId(i32);

impl BookmarkId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for BookmarkId {
    type Error = std::num::TryFromIntError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        i32::try_from(id).map(Self)
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
