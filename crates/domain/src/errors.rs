use thiserror::Error;

/// 领域错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("任务标题不能为空")]
    EmptyTitle,
    #[error("无效的任务状态: {value}")]
    InvalidStatus { value: String },
    #[error("系统内部错误: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
