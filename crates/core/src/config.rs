//! 应用配置
//!
//! TOML文件加载 + 默认值。所有字段都有默认值，配置文件可整体省略。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::DEFAULT_BUFFER_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("解析配置文件失败: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// HTTP监听地址
    pub bind_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 事件日志队列容量
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// 优雅关闭宽限期（秒），超时后强制退出
    pub grace_period_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_seconds: 30,
        }
    }
}

impl AppConfig {
    /// 从TOML文件加载配置
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.bind_address.is_empty() {
            return Err(ConfigError::Invalid("api.bind_address 不能为空".to_string()));
        }
        if self.shutdown.grace_period_seconds == 0 {
            return Err(ConfigError::Invalid(
                "shutdown.grace_period_seconds 必须大于0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.bind_address, "0.0.0.0:8080");
        assert_eq!(config.logging.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.shutdown.grace_period_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbind_address = \"127.0.0.1:9090\"\n\n[logging]\nbuffer_size = 64"
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api.bind_address, "127.0.0.1:9090");
        assert_eq!(config.logging.buffer_size, 64);
        // 未给出的节使用默认值
        assert_eq!(config.shutdown.grace_period_seconds, 30);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load("/nonexistent/taskd.toml").is_err());
    }

    #[test]
    fn test_invalid_grace_period_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[shutdown]\ngrace_period_seconds = 0").unwrap();
        assert!(AppConfig::load(file.path().to_str().unwrap()).is_err());
    }
}
