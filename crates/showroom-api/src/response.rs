//! Success envelope: `{ "status": "success", "message", "resultCount"?, "result"? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status_code: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, result: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(result))
    }

    pub fn created(message: impl Into<String>, result: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(result))
    }

    fn with_status(status_code: StatusCode, message: impl Into<String>, result: Option<T>) -> Self {
        Self {
            status_code,
            body: Envelope {
                status: "success",
                message: message.into(),
                result_count: None,
                result,
            },
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List result, with `resultCount` set to the number of items.
    pub fn list(message: impl Into<String>, items: Vec<T>) -> Self {
        let mut response = Self::ok(message, Vec::new());
        response.body.result_count = Some(items.len());
        response.body.result = Some(items);
        response
    }
}

impl ApiResponse<()> {
    /// Message without a result payload (deletes, logout).
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}
