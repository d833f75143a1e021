use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use taskd_domain::entities::{Task, TaskStatus};

use crate::{
    error::{ApiError, ApiResult},
    routes::AppState,
};

/// 任务创建请求。未知字段直接拒绝。
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    /// 状态以原始字符串接收，由服务层校验，缺省为空串（校验会拒绝）
    #[serde(default)]
    pub status: String,
}

/// 任务列表查询参数
#[derive(Debug, Deserialize)]
pub struct TaskQueryParams {
    pub status: Option<String>,
}

/// 创建任务
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    // 格式错误、未知字段、超出体积上限都归为无效请求体
    let Json(request) = payload.map_err(|_| ApiError::BadRequest("无效的请求体".to_string()))?;

    let task = state
        .task_service
        .create(&request.title, &request.status)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 获取任务列表，支持按状态过滤
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskQueryParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = match params.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            // 未知的过滤值不匹配任何任务
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    let tasks = state.task_service.list(filter).await?;
    Ok(Json(tasks))
}

/// 获取单个任务
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("无效的任务ID".to_string()))?;

    match state.task_service.get_by_id(id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}
