/// Report DTO - Aggregated Health Report
///
/// The value produced by one registry run and rendered by the report
/// endpoint. Check and metric order matches registration order.

use crate::domain::status::{CheckResult, MetricReading, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 健康报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// 总体状态（所有检查结果中最严重的状态）
    pub status: Status,
    /// 各检查结果，按注册顺序
    pub checks: Vec<CheckResult>,
    /// 各指标读数，按注册顺序
    pub metrics: Vec<MetricReading>,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    /// 由检查结果和指标读数组装报告，总体状态由检查结果聚合
    pub fn new(
        checks: Vec<CheckResult>,
        metrics: Vec<MetricReading>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let status = Status::aggregate(checks.iter().map(|c| c.status));
        Self {
            status,
            checks,
            metrics,
            generated_at,
        }
    }

    /// 是否应继续接收流量（`warning` 仅供参考）
    pub fn is_available(&self) -> bool {
        self.status != Status::Critical
    }

    /// 按名称查找检查结果（重名时返回第一个）
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// 按名称查找指标读数
    pub fn metric(&self, name: &str) -> Option<&MetricReading> {
        self.metrics.iter().find(|m| m.name == name)
    }
}
