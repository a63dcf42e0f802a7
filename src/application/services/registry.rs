/// Health Check Registry - Execution and Aggregation
///
/// Holds the ordered checks and metrics of one process and turns them into a
/// `HealthReport`. Built once at startup, populated during initialization and
/// shared read-only (behind an `Arc`) with the report endpoint and the
/// heartbeat schedule.
///
/// ## Execution
/// - Checks run sequentially in registration order, then metrics.
/// - Every probe runs under a per-probe timeout.
/// - `Err`, panics and timeouts become a `critical` result (checks) or an
///   error reading (metrics); they never stop the remaining probes.
///
/// ## Usage
/// ```rust,ignore
/// let mut registry = HealthCheckRegistry::new();
/// registry.register_check(SchedulerCheck::new(store.clone()));
/// let report = registry.run().await;
/// ```

use crate::application::dto::HealthReport;
use crate::domain::check::{Capability, Check, CheckError, Metric};
use crate::domain::status::{CheckResult, MetricReading, Status};
use crate::shared::metrics::METRICS;
use crate::shared::timestamp::{system_clock, SharedClock};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// 默认单个探针超时
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 健康检查注册表
pub struct HealthCheckRegistry {
    checks: Vec<Arc<dyn Check>>,
    metrics: Vec<Arc<dyn Metric>>,
    /// 注册时记录的能力标志
    capabilities: HashSet<Capability>,
    probe_timeout: Duration,
    clock: SharedClock,
}

impl HealthCheckRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            metrics: Vec::new(),
            capabilities: HashSet::new(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            clock: system_clock(),
        }
    }

    /// 设置单个探针超时
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// 设置报告时间戳使用的时钟
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// 注册检查（追加到末尾，允许重名）
    pub fn register_check<C>(&mut self, check: C) -> &mut Self
    where
        C: Check + 'static,
    {
        self.register_shared_check(Arc::new(check))
    }

    /// 注册一个共享的检查实例
    pub fn register_shared_check(&mut self, check: Arc<dyn Check>) -> &mut Self {
        self.capabilities
            .extend(check.capabilities().iter().copied());
        debug!("注册检查: {}", check.name());
        self.checks.push(check);
        self
    }

    /// 注册指标（追加到末尾，允许重名）
    pub fn register_metric<M>(&mut self, metric: M) -> &mut Self
    where
        M: Metric + 'static,
    {
        self.register_shared_metric(Arc::new(metric))
    }

    pub fn register_shared_metric(&mut self, metric: Arc<dyn Metric>) -> &mut Self {
        debug!("注册指标: {}", metric.name());
        self.metrics.push(metric);
        self
    }

    /// 已注册的检查，按注册顺序
    pub fn checks(&self) -> &[Arc<dyn Check>] {
        &self.checks
    }

    /// 已注册的指标，按注册顺序
    pub fn metrics(&self) -> &[Arc<dyn Metric>] {
        &self.metrics
    }

    /// 是否有检查在注册时声明了该能力
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// 执行所有检查和指标，生成报告
    pub async fn run(&self) -> HealthReport {
        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            results.push(self.run_check(check.as_ref()).await);
        }

        let mut readings = Vec::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            readings.push(self.read_metric(metric.as_ref()).await);
        }

        let report = HealthReport::new(results, readings, self.clock.now());
        METRICS
            .reports_total
            .with_label_values(&[report.status.as_str()])
            .inc();
        report
    }

    /// 执行单个检查，失败转换为 `critical` 结果
    async fn run_check(&self, check: &dyn Check) -> CheckResult {
        let name = check.name().to_string();
        let timer = METRICS
            .probe_duration
            .with_label_values(&["check", &name])
            .start_timer();
        let outcome = guarded(self.probe_timeout, check.run()).await;
        let elapsed = timer.stop_and_record();

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                METRICS
                    .probe_failures_total
                    .with_label_values(&["check", e.reason()])
                    .inc();
                error!("检查 {} 执行失败: {}", name, e);
                CheckResult::critical(name, e.to_string())
            }
        };

        debug!("检查 {} 完成: {} ({:.3}s)", result.name, result.status, elapsed);
        if result.status != Status::Ok {
            warn!("检查 {} 状态 {}: {}", result.name, result.status, result.message);
        }
        METRICS
            .check_status
            .with_label_values(&[&result.name])
            .set(result.status.as_gauge());
        result
    }

    /// 读取单个指标，失败转换为带错误标记的读数
    async fn read_metric(&self, metric: &dyn Metric) -> MetricReading {
        let name = metric.name().to_string();
        let timer = METRICS
            .probe_duration
            .with_label_values(&["metric", &name])
            .start_timer();
        let outcome = guarded(self.probe_timeout, metric.value()).await;
        timer.observe_duration();

        match outcome {
            Ok(reading) => reading,
            Err(e) => {
                METRICS
                    .probe_failures_total
                    .with_label_values(&["metric", e.reason()])
                    .inc();
                warn!("指标 {} 采集失败: {}", name, e);
                MetricReading::failed(name, e.to_string())
            }
        }
    }
}

impl Default for HealthCheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HealthCheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheckRegistry")
            .field(
                "checks",
                &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field(
                "metrics",
                &self.metrics.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

/// 在超时和 panic 保护下执行探针
async fn guarded<T, F>(timeout: Duration, probe: F) -> Result<T, CheckError>
where
    F: Future<Output = Result<T, CheckError>>,
{
    match tokio::time::timeout(timeout, AssertUnwindSafe(probe).catch_unwind()).await {
        Err(_) => Err(CheckError::Timeout(timeout)),
        Ok(Err(payload)) => Err(CheckError::Panicked(panic_message(payload))),
        Ok(Ok(outcome)) => outcome,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
