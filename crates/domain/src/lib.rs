//! # Taskd Domain
//!
//! 任务领域模型：实体、错误、仓储抽象和任务服务。

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;

pub use entities::{Task, TaskStatus};
pub use errors::{DomainError, DomainResult};
pub use repositories::TaskRepository;
pub use services::TaskService;
