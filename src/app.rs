use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

use taskd_api::create_app;
use taskd_core::logging::{EventLogger, LogFields};
use taskd_core::AppConfig;
use taskd_domain::TaskService;
use taskd_infrastructure::InMemoryTaskRepository;

/// 主应用程序
///
/// 装配事件日志器、内存仓储和任务服务，并运行HTTP服务。
/// 所有依赖显式注入，不使用进程级单例。
pub struct Application {
    config: AppConfig,
    logger: Arc<EventLogger>,
    task_service: Arc<TaskService>,
}

impl Application {
    /// 创建应用实例。必须在tokio运行时内调用（日志worker随之启动）。
    pub fn new(config: AppConfig) -> Self {
        let logger = Arc::new(EventLogger::new(config.logging.buffer_size));
        let repo = Arc::new(InMemoryTaskRepository::new(Arc::clone(&logger)));
        let task_service = Arc::new(TaskService::new(repo, Arc::clone(&logger)));

        Self {
            config,
            logger,
            task_service,
        }
    }

    /// 事件日志器句柄，供关闭流程排空队列
    pub fn logger(&self) -> Arc<EventLogger> {
        Arc::clone(&self.logger)
    }

    /// 运行HTTP服务直到收到关闭信号
    ///
    /// 收到信号后停止接受新连接，等待在途请求完成后返回。
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let app = create_app(Arc::clone(&self.task_service));

        let bind_address = &self.config.api.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定监听地址失败: {bind_address}"))?;

        info!("HTTP服务监听于 {bind_address}");
        self.logger.info(
            "server.start",
            LogFields::from([("addr".to_string(), json!(bind_address))]),
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .context("HTTP服务运行失败")?;

        info!("HTTP服务已停止");
        Ok(())
    }
}
