use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// 任务实体
///
/// id由仓储在创建时分配（从1起单调递增，永不复用），调用方不得自行指定。
/// 当前版本没有更新操作，`updated_at` 在构造后保持等于 `created_at`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// 构造未持久化的任务，id占位为0，由仓储分配真实id
    pub fn new(title: String, status: TaskStatus) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 任务状态，固定三值枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(DomainError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_timestamps_equal() {
        let task = Task::new("Buy milk".to_string(), TaskStatus::Pending);
        assert_eq!(task.id, 0);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        let err = "bogus".parse::<TaskStatus>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatus { ref value } if value == "bogus"));
    }

    #[test]
    fn test_task_json_shape() {
        let mut task = Task::new("Walk dog".to_string(), TaskStatus::InProgress);
        task.id = 7;
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Walk dog");
        assert_eq!(json["status"], "in_progress");
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_string());
    }
}
