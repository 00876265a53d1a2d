//! Store behaviour against a live postgres, taken from `DATABASE_URL`.
//! Every test returns early when the variable is unset.

use anyhow::{Context, Result};

use bookmark_api::config::{AppConfig, StorageBackend};
use bookmark_api::database::models::{BookmarkChanges, NewBookmark, NewUser, UserChanges};
use bookmark_api::database::{BookmarkStore, DatabaseError, DatabaseManager, PgStore, UserStore};
use bookmark_api::types::UserId;

async fn store() -> Result<Option<PgStore>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping postgres store test");
        return Ok(None);
    };

    let mut config = AppConfig::for_tests().database;
    config.backend = StorageBackend::Postgres;
    config.url = Some(url);

    let pool = DatabaseManager::connect(&config)?;
    DatabaseManager::migrate(&pool).await.context("migrations failed")?;
    Ok(Some(PgStore::new(pool)))
}

async fn new_user(store: &PgStore) -> Result<UserId> {
    let new_user = NewUser {
        email: format!("pg-{}@example.com", uuid::Uuid::new_v4().simple()),
        hash: "hash".to_string(),
    };
    Ok(UserStore::insert(store, new_user).await?.id)
}

fn task() -> NewBookmark {
    NewBookmark {
        title: "Task".to_string(),
        description: Some("Task description".to_string()),
        link: "facebook.com".to_string(),
    }
}

#[tokio::test]
async fn foreign_bookmarks_are_invisible() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let alice = new_user(&store).await?;
    let bob = new_user(&store).await?;
    let bookmark = BookmarkStore::insert(&store, alice, task()).await?;

    assert!(store.list(bob).await?.is_empty());
    assert!(store.find(bob, bookmark.id).await?.is_none());
    let changes = BookmarkChanges {
        title: Some("Mine now".to_string()),
        ..Default::default()
    };
    assert!(BookmarkStore::update(&store, bob, bookmark.id, changes).await?.is_none());
    assert!(!store.delete(bob, bookmark.id).await?);

    let untouched = store.find(alice, bookmark.id).await?.context("owner lost the bookmark")?;
    assert_eq!(untouched, bookmark);
    assert_eq!(store.list(alice).await?, vec![bookmark]);
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_unsupplied_columns() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let owner = new_user(&store).await?;
    let created = BookmarkStore::insert(&store, owner, task()).await?;

    let changes = BookmarkChanges {
        link: Some("https://www.youtube.com/watch?v=d6WC5n9G_sM".to_string()),
        ..Default::default()
    };
    let edited = BookmarkStore::update(&store, owner, created.id, changes)
        .await?
        .context("owner could not edit")?;

    assert_eq!(edited.link, "https://www.youtube.com/watch?v=d6WC5n9G_sM");
    assert_eq!(edited.title, created.title);
    assert_eq!(edited.description, created.description);
    assert_eq!(edited.created_at, created.created_at);
    assert!(edited.updated_at >= created.updated_at);
    Ok(())
}

#[tokio::test]
async fn second_delete_removes_nothing() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let owner = new_user(&store).await?;
    let bookmark = BookmarkStore::insert(&store, owner, task()).await?;

    assert!(store.delete(owner, bookmark.id).await?);
    assert!(store.find(owner, bookmark.id).await?.is_none());
    assert!(!store.delete(owner, bookmark.id).await?);
    Ok(())
}

#[tokio::test]
async fn lists_in_insertion_order() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let owner = new_user(&store).await?;

    let first = BookmarkStore::insert(&store, owner, task()).await?;
    let second = BookmarkStore::insert(&store, owner, task()).await?;

    let ids: Vec<_> = store.list(owner).await?.into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    Ok(())
}

#[tokio::test]
async fn email_constraints_surface_as_unique_violations() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let email = format!("pg-{}@example.com", uuid::Uuid::new_v4().simple());
    let new_user = |email: &str| NewUser {
        email: email.to_string(),
        hash: "hash".to_string(),
    };

    UserStore::insert(&store, new_user(&email)).await?;
    let err = UserStore::insert(&store, new_user(&email)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation(_)), "{err:?}");

    let other = UserStore::insert(&store, new_user(&format!("other-{email}"))).await?.id;
    let changes = UserChanges {
        email: Some(email.clone()),
        ..Default::default()
    };
    let err = UserStore::update(&store, other, changes).await.unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn partial_profile_update_keeps_unsupplied_columns() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let id = new_user(&store).await?;

    let changes = UserChanges {
        first_name: Some("Dang".to_string()),
        ..Default::default()
    };
    let before = store.find_by_id(id).await?.context("user missing")?;
    let after = UserStore::update(&store, id, changes).await?.context("user missing")?;

    assert_eq!(after.first_name.as_deref(), Some("Dang"));
    assert_eq!(after.email, before.email);
    assert_eq!(after.last_name, None);
    Ok(())
}

#[tokio::test]
async fn bookmark_for_unknown_owner_violates_foreign_key() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ghost: UserId = serde_json::from_value(serde_json::json!(i32::MAX))?;

    let err = BookmarkStore::insert(&store, ghost, task()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)), "{err:?}");
    Ok(())
}
