//! Response envelopes
//!
//! Successful responses are `{"success": true, "data": .., "meta": ..}`;
//! failures are `{"success": false, "error": {"code": .., "message": ..}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    /// Success response carrying metadata such as pagination
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// 400 `VALIDATION_ERROR`
    pub fn validation(message: impl Into<String>) -> Response {
        (StatusCode::BAD_REQUEST, Json(Self::new("VALIDATION_ERROR", message))).into_response()
    }

    /// 404 `NOT_FOUND`
    pub fn not_found(message: impl Into<String>) -> Response {
        (StatusCode::NOT_FOUND, Json(Self::new("NOT_FOUND", message))).into_response()
    }

    /// 500 `INTERNAL_ERROR`; the cause is logged, never returned
    pub fn database(error: &sqlx::Error) -> Response {
        tracing::error!(error = %error, "Database error while serving request");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self::new("INTERNAL_ERROR", "A database error occurred")),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_meta() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_success_with_meta() {
        let body = serde_json::to_value(ApiResponse::success_with_meta(
            "x",
            json!({"pagination": {"page": 1}}),
        ))
        .unwrap();
        assert_eq!(body["meta"]["pagination"]["page"], 1);
    }

    #[test]
    fn test_error_shape() {
        let body = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "missing")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": {"code": "NOT_FOUND", "message": "missing"}})
        );

        let detailed = serde_json::to_value(ErrorResponse::with_details(
            "VALIDATION_ERROR",
            "bad",
            json!({"field": "sort"}),
        ))
        .unwrap();
        assert_eq!(detailed["error"]["details"]["field"], "sort");
    }

    #[test]
    fn test_helper_status_codes() {
        assert_eq!(ErrorResponse::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorResponse::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorResponse::database(&sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
