//! Uniform response envelope: `{ok: true, ...}` on success,
//! `{ok: false, error: <stable code>}` on failure. Store detail is logged,
//! never surfaced.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use domains::AppError;

pub struct ApiError(pub AppError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match self.0 {
            // For these two variants the payload is the wire code itself.
            AppError::ValidationError(code) => (StatusCode::BAD_REQUEST, code),
            AppError::AuthenticationError(code) => (StatusCode::UNAUTHORIZED, code),
            AppError::ForbiddenError(_) => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            AppError::NotFound(..) => (StatusCode::NOT_FOUND, "not_found".to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict".to_string()),
            AppError::StoreError(detail) => {
                tracing::error!(detail = %detail, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error".to_string())
            }
        };
        (status, Json(json!({ "ok": false, "error": code }))).into_response()
    }
}

/// Stamp `ok: true` onto a JSON object body.
pub fn ok(mut body: Value) -> Json<Value> {
    if let Value::Object(map) = &mut body {
        map.insert("ok".into(), Value::Bool(true));
    }
    Json(body)
}
