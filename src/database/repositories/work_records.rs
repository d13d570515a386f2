use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::Page;
use crate::database::models::work_record::{WorkRecord, WorkStatus, WorkType};

const COLUMNS: &str = "id, customer_id, staff_user_id, department_id, content, work_date, \
                       status, work_type, created_at, updated_at";

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<WorkRecord>, sqlx::Error> {
    sqlx::query_as::<_, WorkRecord>(&format!("SELECT {} FROM work_records WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Most recent work first, optionally narrowed to one customer.
pub async fn page(
    pool: &PgPool,
    page: Page,
    customer_id: Option<i64>,
) -> Result<Vec<WorkRecord>, sqlx::Error> {
    match customer_id {
        Some(customer_id) => {
            sqlx::query_as::<_, WorkRecord>(&format!(
                "SELECT {} FROM work_records WHERE customer_id = $1 \
                 ORDER BY work_date DESC, id DESC LIMIT $2 OFFSET $3",
                COLUMNS
            ))
            .bind(customer_id)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, WorkRecord>(&format!(
                "SELECT {} FROM work_records ORDER BY work_date DESC, id DESC LIMIT $1 OFFSET $2",
                COLUMNS
            ))
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn count(pool: &PgPool, customer_id: Option<i64>) -> Result<i64, sqlx::Error> {
    let count: (i64,) = match customer_id {
        Some(customer_id) => {
            sqlx::query_as("SELECT COUNT(*) FROM work_records WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM work_records")
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count.0)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    customer_id: i64,
    staff_user_id: i64,
    department_id: Option<i64>,
    content: &str,
    work_date: DateTime<Utc>,
    status: WorkStatus,
    work_type: WorkType,
) -> Result<WorkRecord, sqlx::Error> {
    sqlx::query_as::<_, WorkRecord>(&format!(
        "INSERT INTO work_records \
         (customer_id, staff_user_id, department_id, content, work_date, status, work_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        COLUMNS
    ))
    .bind(customer_id)
    .bind(staff_user_id)
    .bind(department_id)
    .bind(content)
    .bind(work_date)
    .bind(status)
    .bind(work_type)
    .fetch_one(pool)
    .await
}
