/// 后台任务面板检查
///
/// 面板运行状态：running → ok，paused → warning，inactive → critical。

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 任务面板状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    Running,
    Paused,
    Inactive,
}

/// 后台任务面板（由宿主实现）
#[async_trait]
pub trait JobDashboard: Send + Sync {
    async fn status(&self) -> Result<DashboardStatus, CheckError>;
}

pub struct JobDashboardCheck {
    dashboard: Arc<dyn JobDashboard>,
}

impl JobDashboardCheck {
    pub fn new(dashboard: Arc<dyn JobDashboard>) -> Self {
        Self { dashboard }
    }
}

#[async_trait]
impl Check for JobDashboardCheck {
    fn name(&self) -> &str {
        "job_dashboard"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let status = match self.dashboard.status().await {
            Ok(status) => status,
            Err(e) => {
                return Ok(CheckResult::critical(
                    self.name(),
                    format!("Job dashboard is unreachable: {}", e),
                ))
            }
        };

        Ok(match status {
            DashboardStatus::Running => CheckResult::ok(self.name(), "Job dashboard is running"),
            DashboardStatus::Paused => CheckResult::warning(self.name(), "Job dashboard is paused"),
            DashboardStatus::Inactive => {
                CheckResult::critical(self.name(), "Job dashboard is not running")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Status;

    struct Fixed(Result<DashboardStatus, ()>);

    #[async_trait]
    impl JobDashboard for Fixed {
        async fn status(&self) -> Result<DashboardStatus, CheckError> {
            self.0
                .map_err(|_| CheckError::Unreachable("timeout".to_string()))
        }
    }

    async fn run(status: Result<DashboardStatus, ()>) -> Status {
        JobDashboardCheck::new(Arc::new(Fixed(status)))
            .run()
            .await
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(run(Ok(DashboardStatus::Running)).await, Status::Ok);
        assert_eq!(run(Ok(DashboardStatus::Paused)).await, Status::Warning);
        assert_eq!(run(Ok(DashboardStatus::Inactive)).await, Status::Critical);
        assert_eq!(run(Err(())).await, Status::Critical);
    }
}
