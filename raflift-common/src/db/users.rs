//! Users and items queries
//!
//! A user owns zero or more items through `items.owner_id`.

use super::models::{Item, User};
use crate::{Error, Result};
use sqlx::SqlitePool;

/// Insert a user and return it with its assigned id
pub async fn create_user(pool: &SqlitePool, username: &str, email: &str) -> Result<User> {
    let id = sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
        .bind(username)
        .bind(email)
        .execute(pool)
        .await?
        .last_insert_rowid();

    Ok(User {
        id,
        username: Some(username.to_string()),
        email: Some(email.to_string()),
    })
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {}", id)))
}

pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Insert an item, optionally owned by a user
///
/// Fails with `NotFound` if `owner_id` names a user that doesn't exist.
/// The foreign key constraint is the check.
pub async fn create_item(pool: &SqlitePool, title: &str, owner_id: Option<i64>) -> Result<Item> {
    let id = sqlx::query("INSERT INTO items (title, owner_id) VALUES (?, ?)")
        .bind(title)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Error::NotFound(format!("user {}", owner_id.unwrap_or_default()))
            }
            other => Error::Database(other),
        })?
        .last_insert_rowid();

    Ok(Item {
        id,
        title: Some(title.to_string()),
        owner_id,
    })
}

/// Items owned by a user, in insertion order
pub async fn items_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, title, owner_id FROM items WHERE owner_id = ? ORDER BY id ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Owner of an item, `None` for unowned items
pub async fn owner_of(pool: &SqlitePool, item_id: i64) -> Result<Option<User>> {
    let owner_id: Option<Option<i64>> =
        sqlx::query_scalar("SELECT owner_id FROM items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(pool)
            .await?;

    match owner_id {
        None => Err(Error::NotFound(format!("item {}", item_id))),
        Some(None) => Ok(None),
        Some(Some(id)) => get_user(pool, id).await.map(Some),
    }
}
