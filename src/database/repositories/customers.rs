use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::database::models::customer::{Customer, CustomerStatus, CustomerType};

const COLUMNS: &str = "id, name, customer_type, status, department_id, created_at, updated_at";

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(&format!("SELECT {} FROM customers WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn page(pool: &PgPool, page: Page) -> Result<Vec<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(&format!(
        "SELECT {} FROM customers ORDER BY id LIMIT $1 OFFSET $2",
        COLUMNS
    ))
    .bind(page.per_page)
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn find_map(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Customer>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let customers = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {} FROM customers WHERE id = ANY($1)",
        COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(customers.into_iter().map(|c| (c.id, c)).collect())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    customer_type: CustomerType,
    status: CustomerStatus,
    department_id: i64,
) -> Result<Customer, sqlx::Error> {
    sqlx::query_as::<_, Customer>(&format!(
        "INSERT INTO customers (name, customer_type, status, department_id) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        COLUMNS
    ))
    .bind(name)
    .bind(customer_type)
    .bind(status)
    .bind(department_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    customer_type: CustomerType,
    status: CustomerStatus,
    department_id: i64,
) -> Result<Customer, sqlx::Error> {
    sqlx::query_as::<_, Customer>(&format!(
        "UPDATE customers SET name = $2, customer_type = $3, status = $4, \
         department_id = $5, updated_at = now() WHERE id = $1 RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(name)
    .bind(customer_type)
    .bind(status)
    .bind(department_id)
    .fetch_one(pool)
    .await
}

/// Work records go with the customer (FK cascades).
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
