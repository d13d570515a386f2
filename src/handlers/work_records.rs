use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::work_record::{WorkRecord, WorkStatus, WorkType};
use crate::database::models::{Customer, Department, User};
use crate::database::repositories::{customers, departments, users, work_records, Page};
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::validation::config as attribute_config;

use super::{i64_param, pagination_json, require_param_object, string_param, AppState};

#[derive(Debug, Deserialize)]
pub struct WorkRecordQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub customer_id: Option<i64>,
}

/// GET /api/v1/work_records - newest first, optional customer filter
pub async fn index(Query(query): Query<WorkRecordQuery>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = Page::new(query.page, query.per_page);

    let records = work_records::page(&pool, page, query.customer_id).await?;
    let total_count = work_records::count(&pool, query.customer_id).await?;

    let customer_ids: Vec<i64> = records.iter().map(|r| r.customer_id).collect();
    let staff_ids: Vec<i64> = records.iter().map(|r| r.staff_user_id).collect();
    let department_ids: Vec<i64> = records.iter().filter_map(|r| r.department_id).collect();

    let customer_map = customers::find_map(&pool, &customer_ids).await?;
    let staff_map = users::find_map(&pool, &staff_ids).await?;
    let department_map = departments::find_map(&pool, &department_ids).await?;

    let entries: Vec<Value> = records
        .iter()
        .map(|record| {
            work_record_json(
                record,
                customer_map.get(&record.customer_id),
                staff_map.get(&record.staff_user_id),
                record.department_id.and_then(|id| department_map.get(&id)),
            )
        })
        .collect();

    Ok(Json(json!({
        "work_records": entries,
        "pagination": pagination_json(page, total_count),
    })))
}

/// GET /api/v1/work_records/:id
pub async fn show(Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let record = work_records::find(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("work record not found"))?;

    let customer = customers::find(&pool, record.customer_id).await?;
    let staff = users::find(&pool, record.staff_user_id).await?;
    let department = match record.department_id {
        Some(department_id) => departments::find(&pool, department_id).await?,
        None => None,
    };

    Ok(Json(json!({
        "work_record": work_record_json(
            &record,
            customer.as_ref(),
            staff.as_ref(),
            department.as_ref(),
        )
    })))
}

/// POST /api/v1/work_records - staff defaults to the authenticated user,
/// status to in_progress
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let params = require_param_object(&body, "work_record")?;

    let content = string_param(params, "content").unwrap_or_default();
    let work_date_raw = string_param(params, "work_date");
    let work_type_raw = string_param(params, "work_type").unwrap_or_default();
    let status_raw = string_param(params, "status").unwrap_or_else(|| "in_progress".to_string());
    let customer_id = i64_param(params, "customer_id");
    let department_id = i64_param(params, "department_id");
    let staff_user_id = i64_param(params, "staff_user_id").unwrap_or(current_user.id);

    let work_date = match work_date_raw.as_deref() {
        Some(raw) => Some(parse_work_date(raw)?),
        None => None,
    };

    let record = json!({
        "content": content,
        "work_date": work_date.map(|d| d.to_rfc3339()),
        "status": status_raw,
        "work_type": work_type_raw,
    });
    let mut errors = state.rules.work_record.check(&record);

    let pool = DatabaseManager::pool().await?;

    let customer = match customer_id {
        Some(customer_id) => customers::find(&pool, customer_id).await?,
        None => None,
    };
    if customer.is_none() {
        errors.add(
            "customer",
            super::customers::must_exist_message("work_record", "customer"),
        );
    }

    let department = match department_id {
        Some(department_id) => departments::find(&pool, department_id).await?,
        None => None,
    };

    // The rules guarantee these parses once errors is empty
    let (customer, work_date, status, work_type) = match (
        customer,
        work_date,
        WorkStatus::parse(&status_raw),
        WorkType::parse(&work_type_raw),
    ) {
        (Some(customer), Some(work_date), Some(status), Some(work_type))
            if errors.is_empty() =>
        {
            (customer, work_date, status, work_type)
        }
        _ => return Err(errors.into()),
    };

    let staff = users::find(&pool, staff_user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("staff user does not exist"))?;

    let record = work_records::insert(
        &pool,
        customer.id,
        staff.id,
        department.as_ref().map(|d| d.id),
        &content,
        work_date,
        status,
        work_type,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "work_record": work_record_json(
                &record,
                Some(&customer),
                Some(&staff),
                department.as_ref(),
            )
        })),
    ))
}

// Accepts plain dates and full RFC3339 stamps; a date becomes midnight UTC
fn parse_work_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ApiError::bad_request(format!("invalid work_date: {}", raw)))
}

fn work_record_json(
    record: &WorkRecord,
    customer: Option<&Customer>,
    staff: Option<&User>,
    department: Option<&Department>,
) -> Value {
    let registry = attribute_config::registry();
    let type_choices = registry.get_choice_display_names("work_record", "work_type");
    let status_choices = registry.get_choice_display_names("work_record", "status");

    let work_type = record.work_type.as_str();
    let status = record.status.as_str();

    json!({
        "id": record.id,
        "content": record.content,
        "work_date": record.work_date.format("%Y-%m-%d").to_string(),
        "work_type": work_type,
        "work_type_display": type_choices
            .get(work_type)
            .map(String::as_str)
            .unwrap_or(work_type),
        "status": status,
        "status_display": status_choices
            .get(status)
            .map(String::as_str)
            .unwrap_or(status),
        "customer": customer.map(|c| json!({ "id": c.id, "name": c.name })),
        "staff_user": staff.map(|u| json!({ "id": u.id, "email": u.email })),
        "department": department.map(|d| json!({ "id": d.id, "name": d.name })),
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    })
}
