/// 日志文件大小 (MB)
///
/// 文件不存在时读数为 0。

use super::bytes_to_mb;
use crate::domain::check::{CheckError, Metric};
use crate::domain::status::MetricReading;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct LogFileSizeMetric {
    path: PathBuf,
}

impl LogFileSizeMetric {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Metric for LogFileSizeMetric {
    fn name(&self) -> &str {
        "log_file_size"
    }

    async fn value(&self) -> Result<MetricReading, CheckError> {
        let bytes = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        Ok(MetricReading::new(self.name(), bytes_to_mb(bytes)).with_unit("MB"))
    }
}
