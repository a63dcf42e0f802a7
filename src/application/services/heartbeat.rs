/// Heartbeat Producers and Schedule
///
/// Producers write "still alive" markers that the liveness checks read.
/// The core only exposes `tick()`; an external scheduler (cron, a timer task,
/// an orchestration sidecar) is expected to call it once per interval.
///
/// ## Producers
/// - `SchedulerHeartbeat`: writes the `scheduler` heartbeat directly.
/// - `QueueHeartbeat`: enqueues a `HeartbeatJob`; the `queue` heartbeat is
///   only written once a queue worker processes it.
///
/// ## Planning
/// `HeartbeatSchedule::plan` decides which producers exist at boot:
/// the scheduler producer always, the queue producer only when a check with
/// the queue-liveness capability is registered.

use crate::application::services::registry::HealthCheckRegistry;
use crate::domain::check::Capability;
use crate::domain::heartbeat::{HeartbeatStore, StoreError, QUEUE_SOURCE, SCHEDULER_SOURCE};
use crate::domain::job::{HeartbeatJob, JobQueue, QueueError};
use crate::shared::config::HealthConfig;
use crate::shared::metrics::METRICS;
use crate::shared::timestamp::SharedClock;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// 心跳生产错误
#[derive(Debug, thiserror::Error)]
pub enum HeartbeatError {
    #[error("Heartbeat store error: {0}")]
    Store(#[from] StoreError),

    #[error("Job queue error: {0}")]
    Queue(#[from] QueueError),
}

/// 心跳生产者
#[async_trait]
pub trait HeartbeatProducer: Send + Sync {
    /// 心跳来源
    fn source(&self) -> &str;

    /// 一次触发
    async fn tick(&self) -> Result<(), HeartbeatError>;
}

/// 调度器心跳生产者
pub struct SchedulerHeartbeat {
    store: Arc<dyn HeartbeatStore>,
    clock: SharedClock,
}

impl SchedulerHeartbeat {
    pub fn new(store: Arc<dyn HeartbeatStore>, clock: SharedClock) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl HeartbeatProducer for SchedulerHeartbeat {
    fn source(&self) -> &str {
        SCHEDULER_SOURCE
    }

    async fn tick(&self) -> Result<(), HeartbeatError> {
        let result = self.store.write(SCHEDULER_SOURCE, self.clock.now()).await;
        let label = if result.is_ok() { "ok" } else { "error" };
        METRICS
            .heartbeat_writes_total
            .with_label_values(&[SCHEDULER_SOURCE, label])
            .inc();
        result.map_err(Into::into)
    }
}

/// 队列心跳生产者
pub struct QueueHeartbeat {
    queue: Arc<dyn JobQueue>,
}

impl QueueHeartbeat {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl HeartbeatProducer for QueueHeartbeat {
    fn source(&self) -> &str {
        QUEUE_SOURCE
    }

    async fn tick(&self) -> Result<(), HeartbeatError> {
        self.queue.push(HeartbeatJob::queue()).await?;
        Ok(())
    }
}

/// 心跳计划
pub struct HeartbeatSchedule {
    producers: Vec<Arc<dyn HeartbeatProducer>>,
    interval: Duration,
}

impl HeartbeatSchedule {
    /// 根据注册表和配置决定需要触发的生产者
    ///
    /// - `register_schedule = false`: 不触发任何生产者
    /// - 调度器生产者总是启用
    /// - 队列生产者仅在注册了队列存活检查且提供了任务队列时启用
    pub fn plan(
        registry: &HealthCheckRegistry,
        config: &HealthConfig,
        store: Arc<dyn HeartbeatStore>,
        queue: Option<Arc<dyn JobQueue>>,
        clock: SharedClock,
    ) -> Self {
        let interval = config.heartbeat.interval();
        if !config.register_schedule {
            info!("心跳计划已禁用");
            return Self::new(Vec::new(), interval);
        }

        let mut producers: Vec<Arc<dyn HeartbeatProducer>> =
            vec![Arc::new(SchedulerHeartbeat::new(store, clock))];

        if registry.has_capability(Capability::QueueLiveness) {
            match queue {
                Some(queue) => producers.push(Arc::new(QueueHeartbeat::new(queue))),
                None => warn!("已注册队列存活检查但没有进程内任务队列，队列心跳需由外部工作进程写入"),
            }
        } else {
            debug!("未注册队列存活检查，跳过队列心跳");
        }

        Self::new(producers, interval)
    }

    pub fn new(producers: Vec<Arc<dyn HeartbeatProducer>>, interval: Duration) -> Self {
        Self {
            producers,
            interval,
        }
    }

    pub fn producers(&self) -> &[Arc<dyn HeartbeatProducer>] {
        &self.producers
    }

    /// 已计划的心跳来源
    pub fn sources(&self) -> Vec<&str> {
        self.producers.iter().map(|p| p.source()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 触发所有生产者一次，单个失败不影响其他生产者，返回失败数量
    pub async fn tick_all(&self) -> usize {
        let mut failures = 0;
        for producer in &self.producers {
            match producer.tick().await {
                Ok(()) => debug!("心跳已触发: {}", producer.source()),
                Err(e) => {
                    failures += 1;
                    error!("心跳触发失败 {}: {}", producer.source(), e);
                }
            }
        }
        failures
    }

    /// 宿主侧定时驱动：每个间隔触发一次，直到 `shutdown` 完成
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        if self.is_empty() {
            return;
        }
        info!(
            "心跳定时器启动: {:?}，间隔 {:?}",
            self.sources(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick_all().await;
                }
            }
        }
        info!("心跳定时器停止");
    }
}
