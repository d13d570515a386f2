use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::{json, Value};

use crate::auth::{password, token, Claims, Role};
use crate::database::manager::DatabaseManager;
use crate::database::repositories::users;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::validation::{config as attribute_config, messages};

use super::{require_param_object, string_param, AppState};

/// POST /api/v1/auth/login - exchange email/password for a token
pub async fn login(Json(body): Json<Value>) -> Result<impl IntoResponse, ApiError> {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password_input = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let pool = DatabaseManager::pool().await?;
    let user = users::find_by_email(&pool, email).await?;

    // One rejection path for unknown email and wrong password alike
    let user = match user {
        Some(user) if password::verify(password_input, &user.encrypted_password) => user,
        _ => return Err(ApiError::unauthorized("invalid credentials")),
    };

    let claims = Claims::new(user.id);
    let token = token::generate(&claims)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(Json(json!({
        "token": token,
        "user": user.as_session_json(),
        // NB: login says expire_at, signup expires_at; clients depend on both
        "expire_at": claims.expires_at(),
    })))
}

/// POST /api/v1/auth/signup - register a user and log them in
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let params = require_param_object(&body, "user")?;

    let email = string_param(params, "email").unwrap_or_default();
    let password_input = string_param(params, "password").unwrap_or_default();
    let confirmation = string_param(params, "password_confirmation");
    let role_input = string_param(params, "role").unwrap_or_else(|| "staff".to_string());

    let record = json!({
        "email": email,
        "password": password_input,
        "role": role_input,
    });
    let mut errors = state.rules.user.check(&record);

    if let Some(confirmation) = &confirmation {
        if *confirmation != password_input {
            errors.add("password_confirmation", confirmation_message());
        }
    }

    let pool = DatabaseManager::pool().await?;
    if !email.is_empty() && users::email_taken(&pool, &email).await? {
        if let Some(rule) = state
            .rules
            .user
            .unique_rules()
            .iter()
            .find(|r| r.attribute == "email")
        {
            errors.add("email", rule.message.clone());
        }
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let role = Role::parse(&role_input).unwrap_or(Role::Staff);
    let user = users::insert(&pool, &email, &password::digest(&password_input), role).await?;

    let claims = Claims::new(user.id);
    let token = token::generate(&claims)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "user": user.as_session_json(),
            "expires_at": claims.expires_at(),
        })),
    ))
}

/// GET /api/v1/auth/me - current identity from the bearer token
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
            "created_at": user.created_at,
        }
    }))
}

// Confirmation mismatch is a cross-field rule the builder doesn't model;
// the message is composed the same way rule messages are.
fn confirmation_message() -> String {
    let registry = attribute_config::registry();
    let catalog = messages::catalog();
    let locale = &crate::config::config().validation.default_locale;

    format!(
        "{}{}",
        registry.get_display_name("user", "password_confirmation"),
        catalog.get_message("confirmation", locale)
    )
}
