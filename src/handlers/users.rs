use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::Role;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::database::repositories::users;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;

use super::{pagination_json, ListQuery};

/// GET /api/v1/users - paginated staff listing
pub async fn index(Query(query): Query<ListQuery>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = query.page();

    let users = users::page(&pool, page).await?;
    let total_count = users::count(&pool).await?;

    let entries: Vec<Value> = users.iter().map(User::as_api_json).collect();

    Ok(Json(json!({
        "users": entries,
        "pagination": pagination_json(page, total_count),
    })))
}

/// GET /api/v1/users/:id - managers and admins see everyone, staff only
/// themselves
pub async fn show(
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let user = users::find(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    if !current_user.role.satisfies_minimum(Role::Manager) && current_user.id != user.id {
        return Err(ApiError::forbidden("access denied"));
    }

    Ok(Json(json!({ "user": user.as_api_json() })))
}
