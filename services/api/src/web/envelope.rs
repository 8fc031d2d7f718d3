//! services/api/src/web/envelope.rs
//!
//! The uniform JSON envelope wrapped around every response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reading_tracker_core::domain::Paginated;
use serde::Serialize;
use utoipa::ToSchema;

/// Pagination block attached to list responses.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: u32,
    pub total_pages: u64,
    pub count: u64,
    pub per_page: u32,
}

impl<T> From<&Paginated<T>> for PaginationDto {
    fn from(page: &Paginated<T>) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            count: page.count,
            per_page: page.per_page,
        }
    }
}

/// `{data, pagination, message, statusCode, error, statusMessage}`; absent
/// fields are omitted.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationDto>,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub status_message: &'static str,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            pagination: None,
            message: message.into(),
            status_code: status.as_u16(),
            error: None,
            status_message: "success",
        }
    }

    pub fn failure(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            data: None,
            pagination: None,
            message: message.into(),
            status_code: status.as_u16(),
            error: Some(error),
            status_message: "failed",
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationDto) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// A success envelope paired with its status code.
pub struct Reply<T>(pub StatusCode, pub Envelope<T>);

impl<T> Reply<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self(StatusCode::OK, Envelope::success(StatusCode::OK, message, data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self(
            StatusCode::CREATED,
            Envelope::success(StatusCode::CREATED, message, data),
        )
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
