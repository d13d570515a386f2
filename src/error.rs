// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::validation::rules::ValidationErrors;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (malformed/missing parameter shape)
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity (business-rule validation failures)
    UnprocessableEntity(Vec<String>),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to JSON response body.
    ///
    /// Validation failures carry a full-message array; malformed requests a
    /// separate error/message pair; everything else a single error string.
    /// Internal faults show detail in development only.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::BadRequest(message) => json!({
                "error": "bad request",
                "message": message,
            }),
            ApiError::Unauthorized(message) => json!({ "error": message }),
            ApiError::Forbidden(message) => json!({ "error": message }),
            ApiError::NotFound(message) => json!({ "error": message }),
            ApiError::UnprocessableEntity(errors) => json!({ "errors": errors }),
            ApiError::InternalServerError(message) => json!({
                "error": "internal server error",
                "message": if crate::config::is_production() {
                    "Internal Server Error"
                } else {
                    message.as_str()
                },
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(errors: Vec<String>) -> Self {
        ApiError::UnprocessableEntity(errors)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::UnprocessableEntity(errors.full_messages())
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        // Log the real error but return a generic message
        tracing::error!("Database error: {}", err);
        ApiError::internal_server_error(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("record not found"),
            other => {
                tracing::error!("SQLx error: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

impl From<crate::auth::token::TokenError> for ApiError {
    fn from(_: crate::auth::token::TokenError) -> Self {
        // Deliberately undifferentiated: do not leak which check failed
        ApiError::unauthorized("unauthorized")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::UnprocessableEntity(errors) => write!(f, "{}", errors.join(", ")),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_surface_as_422_array() {
        let err = ApiError::unprocessable_entity(vec!["Name is required".to_string()]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_json()["errors"][0], "Name is required");
    }

    #[test]
    fn bad_request_carries_error_and_message() {
        let err = ApiError::bad_request("missing customer parameter");
        let body = err.to_json();
        assert_eq!(body["error"], "bad request");
        assert_eq!(body["message"], "missing customer parameter");
    }

    #[test]
    fn unauthorized_body_is_single_error_field() {
        let err = ApiError::unauthorized("unauthorized");
        assert_eq!(err.to_json(), serde_json::json!({ "error": "unauthorized" }));
    }
}
