/// 队列工作进程
///
/// 逐个消费心跳任务并写入心跳存储。处理失败只记录日志，
/// 对应的心跳会因此过期，由存活检查报告。

use crate::domain::heartbeat::HeartbeatStore;
use crate::domain::job::HeartbeatJob;
use crate::shared::metrics::METRICS;
use crate::shared::timestamp::SharedClock;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info};

/// 队列工作进程
pub struct QueueWorker {
    receiver: Receiver<HeartbeatJob>,
    store: Arc<dyn HeartbeatStore>,
    clock: SharedClock,
}

impl QueueWorker {
    pub fn new(
        receiver: Receiver<HeartbeatJob>,
        store: Arc<dyn HeartbeatStore>,
        clock: SharedClock,
    ) -> Self {
        Self {
            receiver,
            store,
            clock,
        }
    }

    /// 处理下一个任务，队列关闭时返回 `false`
    pub async fn process_next(&mut self) -> bool {
        let Some(job) = self.receiver.recv().await else {
            return false;
        };
        self.handle(&job).await;
        true
    }

    /// 处理所有已在队列中的任务，返回处理数量
    pub async fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(job) = self.receiver.try_recv() {
            self.handle(&job).await;
            processed += 1;
        }
        processed
    }

    /// 主循环，直到所有投递端关闭
    pub async fn run(mut self) {
        info!("队列工作进程启动");
        while self.process_next().await {}
        info!("队列工作进程关闭");
    }

    async fn handle(&self, job: &HeartbeatJob) {
        match job.handle(self.store.as_ref(), self.clock.now()).await {
            Ok(()) => {
                METRICS
                    .heartbeat_writes_total
                    .with_label_values(&[&job.source, "ok"])
                    .inc();
                debug!("心跳任务已处理: {}", job.source);
            }
            Err(e) => {
                METRICS
                    .heartbeat_writes_total
                    .with_label_values(&[&job.source, "error"])
                    .inc();
                error!("心跳任务处理失败 {}: {}", job.source, e);
            }
        }
    }
}
