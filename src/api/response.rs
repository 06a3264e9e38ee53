use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
    pub error_kind: Option<&'static str>,
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    let meta = ResponseMeta {
        status: "success".to_string(),
        status_code: StatusCode::OK.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message: Some("Summary Generated Successfully!".to_string()),
        error_kind: None,
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta,
        }),
    )
}

pub fn error<T>(err: &AppError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = err.status();
    let meta = ResponseMeta {
        status: "error".to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message: Some(err.to_string()),
        error_kind: Some(err.kind()),
    };

    (
        status,
        Json(ApiResponse {
            data: None,
            meta,
        }),
    )
}
