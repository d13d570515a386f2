use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::auth::Role;
use crate::database::models::User;

const COLUMNS: &str = "id, email, encrypted_password, role, created_at, updated_at";

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_map(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = ANY($1)",
        COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// Uniqueness probe backing the email rule.
pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count.0 > 0)
}

pub async fn insert(
    pool: &PgPool,
    email: &str,
    encrypted_password: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, encrypted_password, role) \
         VALUES ($1, $2, $3) RETURNING {}",
        COLUMNS
    ))
    .bind(email)
    .bind(encrypted_password)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn page(pool: &PgPool, page: Page) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
        COLUMNS
    ))
    .bind(page.per_page)
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
