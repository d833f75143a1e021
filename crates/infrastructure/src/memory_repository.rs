//! 内存任务仓储
//!
//! 读写锁保护的HashMap。写操作持排他锁，读操作持共享锁；id分配和插入
//! 在同一个排他临界区内完成，并发创建不会产生重复或空洞的id。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use taskd_core::logging::{EventLogger, LogFields};
use taskd_domain::entities::{Task, TaskStatus};
use taskd_domain::errors::DomainResult;
use taskd_domain::repositories::TaskRepository;

/// 锁内状态：任务表 + 下一个待分配id
struct Store {
    tasks: HashMap<i64, Task>,
    next_id: i64,
}

pub struct InMemoryTaskRepository {
    store: RwLock<Store>,
    logger: Arc<EventLogger>,
}

impl InMemoryTaskRepository {
    pub fn new(logger: Arc<EventLogger>) -> Self {
        Self {
            store: RwLock::new(Store {
                tasks: HashMap::new(),
                next_id: 1,
            }),
            logger,
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, mut task: Task) -> DomainResult<Task> {
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id += 1;

        task.id = id;
        store.tasks.insert(id, task.clone());
        drop(store);

        self.logger.info(
            "repo.create",
            LogFields::from([
                ("id".to_string(), json!(id)),
                ("title".to_string(), json!(task.title)),
                ("status".to_string(), json!(task.status.as_str())),
            ]),
        );
        Ok(task)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Task>> {
        let store = self.store.read().await;
        Ok(store.tasks.get(&id).cloned())
    }

    async fn list(&self, status: Option<TaskStatus>) -> DomainResult<Vec<Task>> {
        let store = self.store.read().await;
        let tasks = store
            .tasks
            .values()
            .filter(|task| status.map_or(true, |s| task.status == s))
            .cloned()
            .collect();
        Ok(tasks)
    }
}
