//! 系统资源指标
//!
//! 基于 sysinfo 采集，采集在阻塞线程池中执行。

use super::round_percent;
use crate::domain::check::{CheckError, Metric};
use crate::domain::status::MetricReading;
use crate::infrastructure::checks::disk_space::disk_usage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use sysinfo::System;

/// 内存使用率 (%)
pub struct MemoryUsageMetric {
    system: Arc<Mutex<System>>,
}

impl MemoryUsageMetric {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for MemoryUsageMetric {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Metric for MemoryUsageMetric {
    fn name(&self) -> &str {
        "memory_usage"
    }

    async fn value(&self) -> Result<MetricReading, CheckError> {
        let system = self.system.clone();
        let (used, total) = tokio::task::spawn_blocking(move || {
            let mut system = system.lock();
            system.refresh_memory();
            (system.used_memory(), system.total_memory())
        })
        .await
        .map_err(|e| CheckError::Failed(e.to_string()))?;

        if total == 0 {
            return Err(CheckError::Failed("total memory unavailable".to_string()));
        }
        let percent = round_percent(used as f64 / total as f64 * 100.0);
        Ok(MetricReading::new(self.name(), percent).with_unit("%"))
    }
}

/// 一分钟平均负载
#[derive(Debug, Default)]
pub struct CpuLoadMetric;

impl CpuLoadMetric {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Metric for CpuLoadMetric {
    fn name(&self) -> &str {
        "cpu_load"
    }

    async fn value(&self) -> Result<MetricReading, CheckError> {
        let load = System::load_average();
        Ok(MetricReading::new(self.name(), (load.one * 100.0).round() / 100.0))
    }
}

/// 磁盘使用率 (%)
pub struct DiskUsageMetric {
    path: PathBuf,
}

impl DiskUsageMetric {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Metric for DiskUsageMetric {
    fn name(&self) -> &str {
        "disk_usage"
    }

    async fn value(&self) -> Result<MetricReading, CheckError> {
        let path = self.path.clone();
        let usage = tokio::task::spawn_blocking(move || disk_usage(&path))
            .await
            .map_err(|e| CheckError::Failed(e.to_string()))??;
        Ok(MetricReading::new(self.name(), round_percent(usage.used_percent())).with_unit("%"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::MetricValue;

    #[tokio::test]
    async fn test_memory_usage_is_percentage() {
        let reading = MemoryUsageMetric::new().value().await;
        // 部分沙箱环境读不到内存信息
        if let Ok(reading) = reading {
            assert_eq!(reading.unit.as_deref(), Some("%"));
            match reading.value {
                Some(MetricValue::Float(v)) => assert!((0.0..=100.0).contains(&v)),
                other => panic!("unexpected value {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_cpu_load_is_non_negative() {
        let reading = CpuLoadMetric::new().value().await.unwrap();
        assert_eq!(reading.name, "cpu_load");
        match reading.value {
            Some(MetricValue::Float(v)) => assert!(v >= 0.0),
            other => panic!("unexpected value {:?}", other),
        }
    }
}
