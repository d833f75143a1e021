//! # Taskd Core
//!
//! 任务服务的共享基础模块：异步事件日志和应用配置。

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use logging::{EventLogger, LogEntry, LogFields, LogLevel};
