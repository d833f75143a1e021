use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;

use taskd_domain::services::TaskService;

use crate::handlers::{
    health::health_check,
    tasks::{create_task, get_task, list_tasks},
};

/// 请求体大小上限：1 MiB
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
