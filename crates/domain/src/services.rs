//! 任务服务
//!
//! 输入校验 + 委托仓储，并通过事件日志记录结果。

use std::sync::Arc;

use serde_json::json;
use taskd_core::logging::{EventLogger, LogFields};

use crate::entities::{Task, TaskStatus};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::TaskRepository;

pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    logger: Arc<EventLogger>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>, logger: Arc<EventLogger>) -> Self {
        Self { repo, logger }
    }

    /// 创建任务
    ///
    /// 标题为空返回 [`DomainError::EmptyTitle`]；状态不在枚举内返回
    /// [`DomainError::InvalidStatus`]。状态在构造任务之前校验。
    pub async fn create(&self, title: &str, status: &str) -> DomainResult<Task> {
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        let status: TaskStatus = status.parse()?;

        let task = Task::new(title.to_string(), status);
        match self.repo.create(task).await {
            Ok(stored) => {
                self.logger.info(
                    "service.create ok",
                    LogFields::from([
                        ("id".to_string(), json!(stored.id)),
                        ("title".to_string(), json!(stored.title)),
                    ]),
                );
                Ok(stored)
            }
            Err(e) => {
                self.logger.error(
                    "service.create failed",
                    LogFields::from([("error".to_string(), json!(e.to_string()))]),
                );
                Err(e)
            }
        }
    }

    /// 按id查找，纯透传
    pub async fn get_by_id(&self, id: i64) -> DomainResult<Option<Task>> {
        self.repo.get_by_id(id).await
    }

    /// 列出任务，纯透传
    pub async fn list(&self, status: Option<TaskStatus>) -> DomainResult<Vec<Task>> {
        self.repo.list(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录调用的桩仓储
    #[derive(Default)]
    struct StubRepository {
        tasks: Mutex<Vec<Task>>,
        fail_create: bool,
    }

    #[async_trait]
    impl TaskRepository for StubRepository {
        async fn create(&self, mut task: Task) -> DomainResult<Task> {
            if self.fail_create {
                return Err(DomainError::Internal("仓储不可用".to_string()));
            }
            let mut tasks = self.tasks.lock().unwrap();
            task.id = tasks.len() as i64 + 1;
            tasks.push(task.clone());
            Ok(task)
        }

        async fn get_by_id(&self, id: i64) -> DomainResult<Option<Task>> {
            Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn list(&self, status: Option<TaskStatus>) -> DomainResult<Vec<Task>> {
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks
                .iter()
                .filter(|t| status.map_or(true, |s| t.status == s))
                .cloned()
                .collect())
        }
    }

    fn service(repo: StubRepository) -> TaskService {
        TaskService::new(Arc::new(repo), Arc::new(EventLogger::nop()))
    }

    #[tokio::test]
    async fn test_create_valid_task() {
        let svc = service(StubRepository::default());
        let task = svc.create("Buy milk", "pending").await.unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn test_create_empty_title_rejected() {
        let svc = service(StubRepository::default());
        let err = svc.create("", "pending").await.unwrap_err();
        assert_eq!(err, DomainError::EmptyTitle);
    }

    #[tokio::test]
    async fn test_create_invalid_status_rejected() {
        let svc = service(StubRepository::default());
        let err = svc.create("Buy milk", "bogus").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatus { .. }));
    }

    #[tokio::test]
    async fn test_create_missing_status_rejected() {
        // 原始请求缺少status时得到空字符串，同样按无效状态处理
        let svc = service(StubRepository::default());
        let err = svc.create("Buy milk", "").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatus { .. }));
    }

    #[tokio::test]
    async fn test_create_propagates_repo_failure() {
        let svc = service(StubRepository {
            fail_create: true,
            ..Default::default()
        });
        let err = svc.create("Buy milk", "pending").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn test_get_and_list_passthrough() {
        let svc = service(StubRepository::default());
        svc.create("Buy milk", "pending").await.unwrap();
        svc.create("Walk dog", "completed").await.unwrap();

        assert!(svc.get_by_id(1).await.unwrap().is_some());
        assert!(svc.get_by_id(99).await.unwrap().is_none());

        assert_eq!(svc.list(None).await.unwrap().len(), 2);
        let pending = svc.list(Some(TaskStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Buy milk");
    }
}
