use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
}

/// Handler-level failure carrying its HTTP status and JSON envelope.
///
/// Resolution failures report `"success": false` alongside the message;
/// the other envelopes carry the message alone.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    success_flag: bool,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            success_flag: false,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            success_flag: false,
        }
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            success_flag: true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: self.success_flag.then_some(false),
            error: self.message,
        });

        (self.status, body).into_response()
    }
}
