/// 文件心跳存储
///
/// 每个来源一个 JSON 文件：`<dir>/<source>.json`。
/// 写入先落到临时文件再原子重命名，读取方永远不会看到半条记录；
/// 多个进程写不同来源互不冲突，同一来源最后写入者胜出。

use crate::domain::heartbeat::{HeartbeatRecord, HeartbeatStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// 临时文件序号
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 文件心跳存储
#[derive(Debug, Clone)]
pub struct FileHeartbeatStore {
    dir: PathBuf,
}

impl FileHeartbeatStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 来源对应的文件路径，来源名只允许字母、数字、`-` 和 `_`
    fn record_path(&self, source: &str) -> Result<PathBuf, StoreError> {
        let valid = !source.is_empty()
            && source
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidSource(source.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", source)))
    }

    fn temp_path(&self, source: &str) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.{}.{}.tmp", source, std::process::id(), seq))
    }
}

/// 写临时文件后重命名为 `path`，任一步失败都删除临时文件
async fn replace_file(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let result = match tokio::fs::write(tmp, bytes).await {
        Ok(()) => tokio::fs::rename(tmp, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(tmp).await;
    }
    result
}

#[async_trait]
impl HeartbeatStore for FileHeartbeatStore {
    async fn write(&self, source: &str, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        let path = self.record_path(source)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let record = HeartbeatRecord::new(source, timestamp);
        let bytes = serde_json::to_vec(&record)?;

        replace_file(&self.temp_path(source), &path, &bytes).await?;

        debug!("心跳已写入 {} -> {}", source, path.display());
        Ok(())
    }

    async fn read(&self, source: &str) -> Result<Option<HeartbeatRecord>, StoreError> {
        let path = self.record_path(source)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
