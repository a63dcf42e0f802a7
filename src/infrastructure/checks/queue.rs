/// 队列积压检查
///
/// 队列连通性与吞吐：积压超过阈值时报警。
/// 工作进程存活由心跳检查 `QueueCheck` 负责。

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 队列连接（由宿主实现）
#[async_trait]
pub trait QueueConnection: Send + Sync {
    /// 待处理任务数
    async fn pending(&self) -> Result<u64, CheckError>;
}

/// 队列积压检查
pub struct QueueBacklogCheck {
    connection: Arc<dyn QueueConnection>,
    warning: u64,
    critical: u64,
}

impl QueueBacklogCheck {
    pub fn new(connection: Arc<dyn QueueConnection>, warning: u64, critical: u64) -> Self {
        Self {
            connection,
            warning,
            critical,
        }
    }
}

#[async_trait]
impl Check for QueueBacklogCheck {
    fn name(&self) -> &str {
        "queue_backlog"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let pending = match self.connection.pending().await {
            Ok(pending) => pending,
            Err(e) => {
                return Ok(CheckResult::critical(
                    self.name(),
                    format!("Could not reach the queue: {}", e),
                ))
            }
        };

        let result = if pending >= self.critical {
            CheckResult::critical(self.name(), format!("{} jobs pending", pending))
        } else if pending >= self.warning {
            CheckResult::warning(self.name(), format!("{} jobs pending", pending))
        } else {
            CheckResult::ok(self.name(), "Queue is processing jobs")
        };
        Ok(result.with_detail("pending", pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::{Scalar, Status};

    struct FixedQueue(Option<u64>);

    #[async_trait]
    impl QueueConnection for FixedQueue {
        async fn pending(&self) -> Result<u64, CheckError> {
            self.0
                .ok_or_else(|| CheckError::Unreachable("broker down".to_string()))
        }
    }

    async fn run_with(pending: Option<u64>) -> CheckResult {
        QueueBacklogCheck::new(Arc::new(FixedQueue(pending)), 100, 1000)
            .run()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_backlog_thresholds() {
        assert_eq!(run_with(Some(0)).await.status, Status::Ok);
        assert_eq!(run_with(Some(99)).await.status, Status::Ok);
        assert_eq!(run_with(Some(100)).await.status, Status::Warning);
        assert_eq!(run_with(Some(1000)).await.status, Status::Critical);
    }

    #[tokio::test]
    async fn test_backlog_detail() {
        let result = run_with(Some(42)).await;
        assert_eq!(result.detail.unwrap().get("pending"), Some(&Scalar::Int(42)));
    }

    #[tokio::test]
    async fn test_unreachable_queue_is_critical() {
        let result = run_with(None).await;
        assert_eq!(result.status, Status::Critical);
        assert!(result.message.contains("broker down"));
    }
}
