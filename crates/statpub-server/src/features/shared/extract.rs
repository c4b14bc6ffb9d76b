//! Request extractors that report malformed input in the JSON error envelope
//!
//! Axum's own `Query` and `Path` reject with a plain-text 400. These
//! wrappers run the same extraction and turn the rejection into a
//! `VALIDATION_ERROR` response.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts,
    },
    response::{IntoResponse, Response},
};

use crate::api::response::ErrorResponse;

/// Query string extractor with an enveloped rejection
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(InvalidRequest))]
pub struct ApiQuery<T>(pub T);

/// Path parameter extractor with an enveloped rejection
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(InvalidRequest))]
pub struct ApiPath<T>(pub T);

/// A query string or path segment that could not be parsed
#[derive(Debug)]
pub struct InvalidRequest(String);

impl From<QueryRejection> for InvalidRequest {
    fn from(rejection: QueryRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<PathRejection> for InvalidRequest {
    fn from(rejection: PathRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl IntoResponse for InvalidRequest {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Rejected malformed request");
        ErrorResponse::validation(self.0)
    }
}
