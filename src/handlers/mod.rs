pub mod auth;
pub mod customers;
pub mod departments;
pub mod users;
pub mod work_records;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::models::Rules;
use crate::database::repositories::Page;
use crate::error::ApiError;

/// Shared handler state: the entity rule sets built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<Rules>,
}

/// page/per_page query parameters accepted by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

pub(crate) fn pagination_json(page: Page, total_count: i64) -> Value {
    json!({
        "current_page": page.number,
        "total_pages": page.total_pages(total_count),
        "total_count": total_count,
    })
}

/// Fetch the wrapped parameter object (`{"customer": {...}}` style) or
/// fail with the 400 shape for malformed requests.
pub(crate) fn require_param_object<'a>(
    body: &'a Value,
    key: &str,
) -> Result<&'a Map<String, Value>, ApiError> {
    body.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::bad_request(format!("missing {} parameter", key)))
}

pub(crate) fn string_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn i64_param(params: &Map<String, Value>, key: &str) -> Option<i64> {
    match params.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        // Tolerate numeric strings the way form-encoded clients send them
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_param_object_rejects_missing_wrapper() {
        let body = json!({ "email": "user@example.com" });
        let err = require_param_object(&body, "user").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn i64_param_accepts_numbers_and_numeric_strings() {
        let params = json!({ "a": 7, "b": "8", "c": "x" });
        let params = params.as_object().unwrap();
        assert_eq!(i64_param(params, "a"), Some(7));
        assert_eq!(i64_param(params, "b"), Some(8));
        assert_eq!(i64_param(params, "c"), None);
        assert_eq!(i64_param(params, "d"), None);
    }
}
