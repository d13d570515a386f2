use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::Role;
use crate::database::manager::DatabaseManager;
use crate::database::models::department::{Department, DepartmentStatus, DepartmentType};
use crate::database::repositories::departments;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::validation::config as attribute_config;

use super::{pagination_json, require_param_object, string_param, AppState, ListQuery};

/// GET /api/v1/departments - paginated listing (feeds the customer form)
pub async fn index(Query(query): Query<ListQuery>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = query.page();

    let departments = departments::page(&pool, page).await?;
    let total_count = departments::count(&pool).await?;

    let entries: Vec<Value> = departments.iter().map(department_json).collect();

    Ok(Json(json!({
        "departments": entries,
        "pagination": pagination_json(page, total_count),
    })))
}

/// POST /api/v1/departments - admin only
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    crate::middleware::auth::require_minimum_role(&current_user, Role::Admin)?;

    let params = require_param_object(&body, "department")?;

    let name = string_param(params, "name").unwrap_or_default();
    let address = string_param(params, "address");
    let status_raw = string_param(params, "status").unwrap_or_else(|| "active".to_string());
    let type_raw = string_param(params, "department_type").unwrap_or_else(|| "other".to_string());

    let record = json!({
        "name": name,
        "address": address,
        "status": status_raw,
        "department_type": type_raw,
    });
    let mut errors = state.rules.department.check(&record);

    let pool = DatabaseManager::pool().await?;
    if !name.is_empty() && departments::name_taken(&pool, &name, None).await? {
        if let Some(rule) = state
            .rules
            .department
            .unique_rules()
            .iter()
            .find(|r| r.attribute == "name")
        {
            errors.add("name", rule.message.clone());
        }
    }

    // The inclusion rules guarantee these parses once errors is empty
    let (status, department_type) = match (
        DepartmentStatus::parse(&status_raw),
        DepartmentType::parse(&type_raw),
    ) {
        (Some(status), Some(department_type)) if errors.is_empty() => (status, department_type),
        _ => return Err(errors.into()),
    };

    let department =
        departments::insert(&pool, &name, address.as_deref(), status, department_type).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "department": department_json(&department) })),
    ))
}

fn department_json(department: &Department) -> Value {
    let registry = attribute_config::registry();
    let type_choices = registry.get_choice_display_names("department", "department_type");
    let status_choices = registry.get_choice_display_names("department", "status");

    let department_type = department.department_type.as_str();
    let status = department.status.as_str();

    json!({
        "id": department.id,
        "name": department.name,
        "address": department.address,
        "status": status,
        "status_display": status_choices
            .get(status)
            .map(String::as_str)
            .unwrap_or(status),
        "department_type": department_type,
        "department_type_display": type_choices
            .get(department_type)
            .map(String::as_str)
            .unwrap_or(department_type),
        "created_at": department.created_at,
        "updated_at": department.updated_at,
    })
}
