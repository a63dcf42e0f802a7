//! 心跳存活检查
//!
//! 读取某个来源的最近一次心跳，比较其年龄与过期阈值：
//!
//! | 情况                         | 状态      |
//! |------------------------------|-----------|
//! | 从未写入                     | critical  |
//! | `now - timestamp > threshold` | critical  |
//! | 其他（含时间戳略超前于 now） | ok        |
//!
//! 结果只取决于最近一次心跳，与心跳次数无关。
//! 存储不可用时返回错误，由注册表转换为 `critical`。

use crate::domain::check::{Capability, Check, CheckError};
use crate::domain::heartbeat::{HeartbeatStore, QUEUE_SOURCE, SCHEDULER_SOURCE};
use crate::domain::status::CheckResult;
use crate::shared::timestamp::{system_clock, SharedClock};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// 默认过期阈值：两倍生产者间隔
pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(120);

/// 通用心跳存活检查
pub struct LivenessCheck {
    name: String,
    source: String,
    threshold: Duration,
    store: Arc<dyn HeartbeatStore>,
    clock: SharedClock,
}

impl LivenessCheck {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        store: Arc<dyn HeartbeatStore>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            threshold: DEFAULT_THRESHOLD,
            store,
            clock: system_clock(),
        }
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    async fn evaluate(&self) -> Result<CheckResult, CheckError> {
        let Some(record) = self.store.read(&self.source).await? else {
            return Ok(CheckResult::critical(
                &self.name,
                format!("The {} has never reported a heartbeat", self.source),
            ));
        };

        let now = self.clock.now();
        // 时间戳晚于 now（时钟抖动）按年龄 0 处理
        let age = (now - record.timestamp).to_std().unwrap_or(Duration::ZERO);
        let result = if age > self.threshold {
            CheckResult::critical(
                &self.name,
                format!(
                    "Stale heartbeat: the {} last reported {}s ago (threshold {}s)",
                    self.source,
                    age.as_secs(),
                    self.threshold.as_secs()
                ),
            )
        } else {
            CheckResult::ok(
                &self.name,
                format!("The {} reported {}s ago", self.source, age.as_secs()),
            )
        };

        Ok(result
            .with_detail("last_heartbeat", record.timestamp.to_rfc3339())
            .with_detail("age_seconds", age.as_secs())
            .with_detail("threshold_seconds", self.threshold.as_secs()))
    }
}

#[async_trait]
impl Check for LivenessCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        self.evaluate().await
    }
}

/// 调度器存活检查
pub struct SchedulerCheck(LivenessCheck);

impl SchedulerCheck {
    pub fn new(store: Arc<dyn HeartbeatStore>) -> Self {
        Self(LivenessCheck::new("scheduler", SCHEDULER_SOURCE, store))
    }

    pub fn with_threshold(self, threshold: Duration) -> Self {
        Self(self.0.with_threshold(threshold))
    }

    pub fn with_clock(self, clock: SharedClock) -> Self {
        Self(self.0.with_clock(clock))
    }
}

#[async_trait]
impl Check for SchedulerCheck {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        self.0.evaluate().await
    }
}

/// 队列工作进程存活检查
///
/// 注册后启用队列心跳生产者。
pub struct QueueCheck(LivenessCheck);

impl QueueCheck {
    pub fn new(store: Arc<dyn HeartbeatStore>) -> Self {
        Self(LivenessCheck::new("queue", QUEUE_SOURCE, store))
    }

    pub fn with_threshold(self, threshold: Duration) -> Self {
        Self(self.0.with_threshold(threshold))
    }

    pub fn with_clock(self, clock: SharedClock) -> Self {
        Self(self.0.with_clock(clock))
    }
}

#[async_trait]
impl Check for QueueCheck {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        self.0.evaluate().await
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::QueueLiveness]
    }
}
