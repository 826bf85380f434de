use axum::{body::Bytes, http::StatusCode, Json};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{ApiResponse, IdField};

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::ok(data))))
}

pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// Decodes a JSON body. An empty body decodes as `T::default()` so that
/// the handler reports which fields are missing.
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e)))
}

/// Returns the trimmed value, or `None` when absent or blank.
pub fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn id_field(value: &Option<IdField>, label: &str) -> Result<Option<i64>, ApiError> {
    match value {
        None => Ok(None),
        Some(id) if id.is_blank() => Ok(None),
        Some(id) => id
            .as_i64()
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("Invalid {}", label))),
    }
}

pub fn parse_id(value: Option<&str>, label: &str) -> Result<i64, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing {}", label)))?;
    value
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid {}", label)))
}
