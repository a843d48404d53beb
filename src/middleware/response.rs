use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Success responses in the API's wire format: `{ "data": ... }` for payloads,
/// `{ "message": ... }` for confirmations, bare 204 for silent mutations.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize = ()> {
    body: ResponseBody<T>,
    status: StatusCode,
}

#[derive(Debug)]
enum ResponseBody<T: Serialize> {
    Data(T),
    Message(String),
    Empty,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `{ "data": ... }`
    pub fn data(data: T) -> Self {
        Self {
            body: ResponseBody::Data(data),
            status: StatusCode::OK,
        }
    }

    /// 201 with `{ "data": ... }`
    pub fn created(data: T) -> Self {
        Self {
            body: ResponseBody::Data(data),
            status: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<()> {
    /// 200 with `{ "message": ... }`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            body: ResponseBody::Message(message.into()),
            status: StatusCode::OK,
        }
    }

    /// 201 with `{ "message": ... }`
    pub fn created_message(message: impl Into<String>) -> Self {
        Self {
            body: ResponseBody::Message(message.into()),
            status: StatusCode::CREATED,
        }
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            body: ResponseBody::Empty,
            status: StatusCode::NO_CONTENT,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::Empty => self.status.into_response(),
            ResponseBody::Message(message) => {
                (self.status, Json(json!({ "message": message }))).into_response()
            }
            ResponseBody::Data(data) => match serde_json::to_value(&data) {
                Ok(value) => (self.status, Json(json!({ "data": value }))).into_response(),
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data",
                            "code": "INTERNAL_SERVER_ERROR",
                        })),
                    )
                        .into_response()
                }
            },
        }
    }
}

/// Handler return type: success envelope or mapped ApiError
pub type ApiResult<T = ()> = Result<ApiResponse<T>, crate::error::ApiError>;
