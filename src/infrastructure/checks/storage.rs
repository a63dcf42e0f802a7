/// 存储可写性检查
///
/// 在目标目录写入探测文件，读回比较后删除。

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static PROBE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 存储检查
pub struct StorageCheck {
    dir: PathBuf,
}

impl StorageCheck {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn probe(&self) -> Result<(), CheckError> {
        let seq = PROBE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = self
            .dir
            .join(format!(".vigilant-health-{}-{}", std::process::id(), seq));
        let payload = format!("probe-{}", seq);

        tokio::fs::write(&path, payload.as_bytes()).await?;
        let read_back = tokio::fs::read_to_string(&path).await;
        tokio::fs::remove_file(&path).await?;

        if read_back? != payload {
            return Err(CheckError::Failed("read back different content".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Check for StorageCheck {
    fn name(&self) -> &str {
        "storage"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(CheckResult::critical(
                self.name(),
                format!("Storage directory {} does not exist", self.dir.display()),
            ));
        }

        Ok(match self.probe().await {
            Ok(()) => CheckResult::ok(self.name(), "Storage is writable"),
            Err(e) => CheckResult::critical(
                self.name(),
                format!("Storage {} is not writable: {}", self.dir.display(), e),
            ),
        }
        .with_detail("path", self.dir.display().to_string()))
    }
}
