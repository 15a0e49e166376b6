use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform JSON envelope for every REST response.
///
/// Exactly one of `data` / `error` is typically set; `message` carries a
/// human-readable note (e.g. after a delete).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    /// RFC3339 timestamp when the response was produced
    pub timestamp: String,
}

/// Page metadata attached to list responses when pagination was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            pagination: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Successful response without payload, only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            pagination: None,
            timestamp: now_rfc3339(),
        }
    }

    /// Failed response carrying an error string.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            pagination: None,
            timestamp: now_rfc3339(),
        }
    }
}

/// 200 OK + envelope
pub fn ok_json<T: Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::ok(value)))
}

/// 201 Created + envelope
pub fn created_json<T: Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::ok(value)))
}

/// 200 OK + envelope with only a message
pub fn message_json(message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::message(message)))
}
