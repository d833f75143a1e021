//! # Taskd API
//!
//! 任务服务的REST接口，基于Axum构建。
//!
//! ## API 端点
//!
//! - `GET /tasks` - 获取任务列表，支持 `?status=` 过滤
//! - `POST /tasks` - 创建任务
//! - `GET /tasks/{id}` - 获取任务详情
//! - `GET /health` - 存活探针
//!
//! 任务JSON格式: `{id, title, status, created_at, updated_at}`；
//! 错误JSON格式: `{"error": "..."}`。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};
use taskd_domain::services::TaskService;

/// 创建完整的API应用
pub fn create_app(task_service: Arc<TaskService>) -> Router {
    let state = AppState { task_service };

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(cors_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
