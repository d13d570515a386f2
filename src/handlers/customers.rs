use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::{json, Map, Value};

use crate::auth::Role;
use crate::database::manager::DatabaseManager;
use crate::database::models::customer::{Customer, CustomerStatus, CustomerType};
use crate::database::models::Department;
use crate::database::repositories::{customers, departments};
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::validation::{config as attribute_config, messages};

use super::{i64_param, pagination_json, require_param_object, string_param, AppState, ListQuery};

/// GET /api/v1/customers - paginated listing with embedded departments
pub async fn index(Query(query): Query<ListQuery>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = query.page();

    let customers = customers::page(&pool, page).await?;
    let total_count = customers::count(&pool).await?;

    let department_ids: Vec<i64> = customers.iter().map(|c| c.department_id).collect();
    let departments = departments::find_map(&pool, &department_ids).await?;

    let entries: Vec<Value> = customers
        .iter()
        .map(|customer| customer_json(customer, departments.get(&customer.department_id)))
        .collect();

    Ok(Json(json!({
        "customers": entries,
        "pagination": pagination_json(page, total_count),
    })))
}

/// GET /api/v1/customers/:id
pub async fn show(Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let customer = customers::find(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("customer not found"))?;
    let department = departments::find(&pool, customer.department_id).await?;

    Ok(Json(json!({ "customer": customer_json(&customer, department.as_ref()) })))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let params = require_param_object(&body, "customer")?;
    let attributes = CustomerAttributes::from_params(params, None);

    let pool = DatabaseManager::pool().await?;
    let validated = attributes.validate(&state, &pool).await?;

    let customer = customers::insert(
        &pool,
        &attributes.name,
        validated.customer_type,
        validated.status,
        validated.department.id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "customer": customer_json(&customer, Some(&validated.department)) })),
    ))
}

/// PUT/PATCH /api/v1/customers/:id - absent fields keep their values
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let existing = customers::find(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("customer not found"))?;

    let params = require_param_object(&body, "customer")?;
    let attributes = CustomerAttributes::from_params(params, Some(&existing));
    let validated = attributes.validate(&state, &pool).await?;

    let customer = customers::update(
        &pool,
        id,
        &attributes.name,
        validated.customer_type,
        validated.status,
        validated.department.id,
    )
    .await?;

    Ok(Json(json!({ "customer": customer_json(&customer, Some(&validated.department)) })))
}

/// DELETE /api/v1/customers/:id - manager or admin only
pub async fn destroy(
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    crate::middleware::auth::require_minimum_role(&current_user, Role::Manager)?;

    let pool = DatabaseManager::pool().await?;
    if !customers::delete(&pool, id).await? {
        return Err(ApiError::not_found("customer not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Incoming attributes with update fallbacks already applied.
struct CustomerAttributes {
    name: String,
    customer_type_raw: String,
    status_raw: String,
    department_id: Option<i64>,
}

/// Attributes that survived the rule check, typed for the repository.
struct ValidatedCustomer {
    customer_type: CustomerType,
    status: CustomerStatus,
    department: Department,
}

impl CustomerAttributes {
    fn from_params(params: &Map<String, Value>, existing: Option<&Customer>) -> Self {
        Self {
            name: string_param(params, "name")
                .or_else(|| existing.map(|c| c.name.clone()))
                .unwrap_or_default(),
            customer_type_raw: string_param(params, "customer_type")
                .or_else(|| existing.map(|c| c.customer_type.as_str().to_string()))
                .unwrap_or_default(),
            // Intake starts every unspecified customer as pending
            status_raw: string_param(params, "status")
                .or_else(|| existing.map(|c| c.status.as_str().to_string()))
                .unwrap_or_else(|| "pending".to_string()),
            department_id: i64_param(params, "department_id")
                .or_else(|| existing.map(|c| c.department_id)),
        }
    }

    /// Rule check plus the department existence probe.
    async fn validate(
        &self,
        state: &AppState,
        pool: &sqlx::PgPool,
    ) -> Result<ValidatedCustomer, ApiError> {
        let record = json!({
            "name": self.name,
            "customer_type": self.customer_type_raw,
            "status": self.status_raw,
        });
        let mut errors = state.rules.customer.check(&record);

        let department = match self.department_id {
            Some(department_id) => departments::find(pool, department_id).await?,
            None => None,
        };
        if department.is_none() {
            errors.add("department", must_exist_message("customer", "department"));
        }

        // The inclusion rules guarantee these parses once errors is empty
        match (
            CustomerType::parse(&self.customer_type_raw),
            CustomerStatus::parse(&self.status_raw),
            department,
        ) {
            (Some(customer_type), Some(status), Some(department)) if errors.is_empty() => {
                Ok(ValidatedCustomer {
                    customer_type,
                    status,
                    department,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

pub(super) fn must_exist_message(entity: &str, attribute: &str) -> String {
    let registry = attribute_config::registry();
    let catalog = messages::catalog();
    let locale = &crate::config::config().validation.default_locale;

    format!(
        "{}{}",
        registry.get_display_name(entity, attribute),
        catalog.get_message("must_exist", locale)
    )
}

fn customer_json(customer: &Customer, department: Option<&Department>) -> Value {
    let registry = attribute_config::registry();
    let type_choices = registry.get_choice_display_names("customer", "customer_type");
    let status_choices = registry.get_choice_display_names("customer", "status");

    let customer_type = customer.customer_type.as_str();
    let status = customer.status.as_str();

    json!({
        "id": customer.id,
        "name": customer.name,
        "customer_type": customer_type,
        "customer_type_display": type_choices
            .get(customer_type)
            .map(String::as_str)
            .unwrap_or(customer_type),
        "status": status,
        "status_display": status_choices
            .get(status)
            .map(String::as_str)
            .unwrap_or(status),
        "department": department.map(|d| json!({ "id": d.id, "name": d.name })),
        "created_at": customer.created_at,
        "updated_at": customer.updated_at,
    })
}
