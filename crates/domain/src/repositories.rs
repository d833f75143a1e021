//! 领域仓储抽象
//!
//! 数据访问的抽象接口，遵循依赖倒置原则。内存实现见 taskd-infrastructure。

use async_trait::async_trait;

use crate::entities::{Task, TaskStatus};
use crate::errors::DomainResult;

/// 任务仓储抽象
///
/// 内存实现永不失败，返回 `DomainResult` 是为了保留API层的500路径。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 分配下一个id并存储任务，返回存储后的副本
    async fn create(&self, task: Task) -> DomainResult<Task>;
    /// 按id查找，不存在时返回None
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Task>>;
    /// 列出任务；给定状态过滤器时只返回匹配的任务，顺序不保证
    async fn list(&self, status: Option<TaskStatus>) -> DomainResult<Vec<Task>>;
}
