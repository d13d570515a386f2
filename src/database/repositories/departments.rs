use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::database::models::department::{Department, DepartmentStatus, DepartmentType};

const COLUMNS: &str = "id, name, address, status, department_type, created_at, updated_at";

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!("SELECT {} FROM departments WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Batch lookup keyed by id, for embedding department summaries without a
/// per-row query.
pub async fn find_map(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Department>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let departments = sqlx::query_as::<_, Department>(&format!(
        "SELECT {} FROM departments WHERE id = ANY($1)",
        COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(departments.into_iter().map(|d| (d.id, d)).collect())
}

pub async fn page(pool: &PgPool, page: Page) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!(
        "SELECT {} FROM departments ORDER BY id LIMIT $1 OFFSET $2",
        COLUMNS
    ))
    .bind(page.per_page)
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    address: Option<&str>,
    status: DepartmentStatus,
    department_type: DepartmentType,
) -> Result<Department, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!(
        "INSERT INTO departments (name, address, status, department_type) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        COLUMNS
    ))
    .bind(name)
    .bind(address)
    .bind(status)
    .bind(department_type)
    .fetch_one(pool)
    .await
}

/// Uniqueness probe backing the department name rule.
pub async fn name_taken(pool: &PgPool, name: &str, exclude_id: Option<i64>) -> Result<bool, sqlx::Error> {
    let count: (i64,) = match exclude_id {
        Some(id) => {
            sqlx::query_as("SELECT COUNT(*) FROM departments WHERE name = $1 AND id <> $2")
                .bind(name)
                .bind(id)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM departments WHERE name = $1")
                .bind(name)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count.0 > 0)
}
