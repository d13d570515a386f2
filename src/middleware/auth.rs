use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{token, Role};
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::database::repositories::users;
use crate::error::ApiError;

/// Authenticated identity attached to the request after the token
/// resolves. Carries the full user row so handlers can authorize without
/// another lookup.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Bearer-token authentication. The request either ends up Authenticated
/// (user in extensions) or Rejected (401); the rejection text never says
/// which check failed.
pub async fn authenticate_request(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or_else(unauthorized)?;

    let claims = token::verify(&token)?;

    // The subject must still resolve to a live identity; a deleted user's
    // token is as dead as a forged one.
    let pool = DatabaseManager::pool().await?;
    let user = users::find(&pool, claims.user_id)
        .await?
        .ok_or_else(unauthorized)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Minimum-role authorization: permit identities whose role rank is at or
/// above the required rank.
pub fn require_minimum_role(user: &User, minimum: Role) -> Result<(), ApiError> {
    if user.role.satisfies_minimum(minimum) {
        return Ok(());
    }

    Err(ApiError::forbidden(format!(
        "Forbidden: {} role or above required",
        minimum
    )))
}

fn unauthorized() -> ApiError {
    ApiError::unauthorized("unauthorized")
}

/// "Bearer TOKEN" → TOKEN. Missing header, non-bearer scheme, and empty
/// tokens all come back as None.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get("authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn user_with_role(role: Role) -> User {
        User {
            id: 1,
            email: "staff@example.com".to_string(),
            encrypted_password: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    // Pins the authorization direction: at-or-above the minimum permits.
    #[test]
    fn minimum_role_check_matrix() {
        let minimum = Role::Manager;
        assert!(require_minimum_role(&user_with_role(Role::Manager), minimum).is_ok());
        assert!(require_minimum_role(&user_with_role(Role::Admin), minimum).is_ok());

        let err = require_minimum_role(&user_with_role(Role::Staff), minimum).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
        assert_eq!(
            err.to_json()["error"],
            "Forbidden: Manager role or above required"
        );
    }
}
