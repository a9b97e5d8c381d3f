use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{ success: true, message, data }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Status code paired with an envelope; what the handlers return on success.
#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(
            status,
            ApiResponse {
                success: true,
                message: message.into(),
                data: Some(data),
            },
        )
    }
}

impl ApiSuccess<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiSuccess(
            StatusCode::OK,
            ApiResponse {
                success: true,
                message: message.into(),
                data: None,
            },
        )
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
