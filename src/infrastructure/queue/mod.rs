/// 进程内任务队列
///
/// 基于 tokio mpsc 的 `JobQueue` 实现，以及消费心跳任务的 `QueueWorker`。
/// 跨进程部署时由宿主提供自己的 `JobQueue`，工作进程调用 `HeartbeatJob::handle`。

pub mod worker;

pub use worker::QueueWorker;

use crate::domain::check::CheckError;
use crate::domain::job::{HeartbeatJob, JobQueue, QueueError};
use crate::infrastructure::checks::queue::QueueConnection;
use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};

/// 默认队列容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// 进程内任务队列
#[derive(Debug, Clone)]
pub struct InProcessJobQueue {
    sender: Sender<HeartbeatJob>,
}

impl InProcessJobQueue {
    /// 创建队列，返回投递端和接收端
    pub fn new(capacity: usize) -> (Self, Receiver<HeartbeatJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// 当前积压的任务数
    pub fn backlog(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

#[async_trait]
impl JobQueue for InProcessJobQueue {
    async fn push(&self, job: HeartbeatJob) -> Result<(), QueueError> {
        // 队列满说明工作进程已积压，不阻塞生产者
        self.sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Backend("queue is full".to_string()),
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

#[async_trait]
impl QueueConnection for InProcessJobQueue {
    async fn pending(&self) -> Result<u64, CheckError> {
        if self.sender.is_closed() {
            return Err(CheckError::Unreachable("job queue is closed".to_string()));
        }
        Ok(self.backlog() as u64)
    }
}
