use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use taskd_core::logging::LogFields;
use taskd_core::AppConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod shutdown;

use app::Application;
use shutdown::ShutdownManager;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("taskd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("内存任务管理HTTP服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，缺省时使用内置默认值"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("HTTP监听地址，覆盖配置文件"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let log_level = matches.get_one::<String>("log-level").unwrap();
    let log_format = matches.get_one::<String>("log-format").unwrap();

    // 初始化tracing（框架诊断日志；业务事件走EventLogger）
    init_logging(log_level, log_format)?;

    info!("启动任务服务");

    // 加载配置
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::load(path).with_context(|| format!("加载配置文件失败: {path}"))?,
        None => AppConfig::default(),
    };
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.api.bind_address = bind.clone();
    }

    let grace_period = Duration::from_secs(config.shutdown.grace_period_seconds);

    // 创建应用实例
    let app = Application::new(config);
    let logger = app.logger();

    // 创建优雅关闭管理器并启动应用
    let shutdown_manager = ShutdownManager::new();
    let shutdown_rx = shutdown_manager.subscribe().await;
    let mut app_handle = tokio::spawn(async move { app.run(shutdown_rx).await });

    tokio::select! {
        // 服务自行退出（通常是启动失败）
        result = &mut app_handle => {
            logger.shutdown().await;
            match result {
                Ok(Ok(())) => {
                    warn!("HTTP服务意外停止");
                }
                Ok(Err(e)) => {
                    error!("服务运行失败: {e:#}");
                    return Err(e);
                }
                Err(e) => {
                    error!("服务任务异常终止: {e}");
                    return Err(e.into());
                }
            }
        }
        _ = wait_for_shutdown_signal() => {
            info!("收到关闭信号，开始优雅关闭...");
            shutdown_manager.shutdown().await;

            // 在宽限期内等待在途请求完成，超时则强制退出
            match tokio::time::timeout(grace_period, &mut app_handle).await {
                Ok(Ok(Ok(()))) => {
                    info!("应用已优雅关闭");
                }
                Ok(Ok(Err(e))) => {
                    error!("应用关闭时发生错误: {e:#}");
                }
                Ok(Err(e)) => {
                    error!("服务任务异常终止: {e}");
                }
                Err(_) => {
                    warn!("应用关闭超时（{}秒），强制退出", grace_period.as_secs());
                    app_handle.abort();
                }
            }

            // 排空事件日志队列
            logger.info("server.stop", LogFields::new());
            logger.shutdown().await;
        }
    }

    info!("任务服务已退出");
    Ok(())
}

/// 初始化日志系统
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("安装Ctrl+C信号处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("安装SIGTERM信号处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
