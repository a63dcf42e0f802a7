/// 磁盘空间检查
///
/// 通过 sysinfo 找到包含目标路径的挂载点（最长前缀匹配），
/// 按已用百分比判断：≥ warning 为 warning，≥ critical 为 critical。

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// 磁盘使用情况
#[derive(Debug, Clone, PartialEq)]
pub struct DiskUsage {
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl DiskUsage {
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let used = self.total_bytes.saturating_sub(self.available_bytes);
        used as f64 / self.total_bytes as f64 * 100.0
    }
}

/// 查询包含 `path` 的磁盘
pub fn disk_usage(path: &Path) -> Result<DiskUsage, CheckError> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .filter(|disk| target.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| DiskUsage {
            mount_point: disk.mount_point().to_path_buf(),
            total_bytes: disk.total_space(),
            available_bytes: disk.available_space(),
        })
        .ok_or_else(|| {
            CheckError::Failed(format!("No disk found for {}", target.display()))
        })
}

pub struct DiskSpaceCheck {
    path: PathBuf,
    warning_percent: f64,
    critical_percent: f64,
}

impl DiskSpaceCheck {
    pub fn new(path: impl Into<PathBuf>, warning_percent: f64, critical_percent: f64) -> Self {
        Self {
            path: path.into(),
            warning_percent,
            critical_percent,
        }
    }

    fn evaluate(&self, usage: &DiskUsage) -> CheckResult {
        let percent = usage.used_percent();
        let message = format!(
            "Disk {} is {:.1}% full",
            usage.mount_point.display(),
            percent
        );
        let result = if percent >= self.critical_percent {
            CheckResult::critical(self.name(), message)
        } else if percent >= self.warning_percent {
            CheckResult::warning(self.name(), message)
        } else {
            CheckResult::ok(self.name(), message)
        };
        result
            .with_detail("used_percent", (percent * 10.0).round() / 10.0)
            .with_detail("available_bytes", usage.available_bytes)
            .with_detail("total_bytes", usage.total_bytes)
    }
}

#[async_trait]
impl Check for DiskSpaceCheck {
    fn name(&self) -> &str {
        "disk_space"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let path = self.path.clone();
        let usage = tokio::task::spawn_blocking(move || disk_usage(&path))
            .await
            .map_err(|e| CheckError::Failed(e.to_string()))??;
        Ok(self.evaluate(&usage))
    }
}
