pub mod bookmark;
pub mod user;

pub use bookmark::{Bookmark, BookmarkChanges, NewBookmark};
pub use user::{NewUser, User, UserChanges};
