//! 队列心跳任务与任务队列契约
//!
//! 队列心跳生产者不直接写存储，而是投递一个 `HeartbeatJob`。
//! 只有队列工作进程真正处理了任务，`queue` 心跳才会更新，
//! 因此工作进程停止或积压都会表现为心跳过期。

use super::heartbeat::{HeartbeatStore, StoreError, QUEUE_SOURCE};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 心跳任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatJob {
    /// 处理时写入的心跳来源
    pub source: String,
}

impl HeartbeatJob {
    /// 队列工作进程心跳任务
    pub fn queue() -> Self {
        Self {
            source: QUEUE_SOURCE.to_string(),
        }
    }

    /// 处理任务：在 `processed_at` 时刻写入心跳
    pub async fn handle(
        &self,
        store: &dyn HeartbeatStore,
        processed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        store.write(&self.source, processed_at).await
    }
}

/// 任务投递错误
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Job queue is closed")]
    Closed,

    #[error("Job queue backend error: {0}")]
    Backend(String),
}

/// 任务队列
///
/// 由宿主提供，工作进程可以在其他进程中消费。
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn push(&self, job: HeartbeatJob) -> Result<(), QueueError>;
}
