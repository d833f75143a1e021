use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskd_domain::errors::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("任务不存在")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Domain(DomainError::EmptyTitle)
            | ApiError::Domain(DomainError::InvalidStatus { .. })
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Internal(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // 统一错误响应格式: {"error": "..."}
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
