//! 心跳存储契约
//!
//! 心跳记录按来源（`scheduler`、`queue`）存储，每次写入覆盖上一次记录。
//! Web 进程与调度/队列进程通过同一个后端存储交换心跳，不共享内存。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 调度器心跳来源
pub const SCHEDULER_SOURCE: &str = "scheduler";

/// 队列工作进程心跳来源
pub const QUEUE_SOURCE: &str = "queue";

/// 心跳记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    /// 来源
    pub source: String,
    /// 最近一次心跳时间
    pub timestamp: DateTime<Utc>,
}

impl HeartbeatRecord {
    pub fn new(source: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            source: source.into(),
            timestamp,
        }
    }
}

/// 心跳存储错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed heartbeat record: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid heartbeat source: {0:?}")]
    InvalidSource(String),
}

/// 心跳存储
///
/// 同一来源的写入遵循最后写入者胜出，不保留历史。
#[async_trait]
pub trait HeartbeatStore: Send + Sync {
    /// 记录 `source` 的最新心跳时间
    async fn write(&self, source: &str, timestamp: DateTime<Utc>) -> Result<(), StoreError>;

    /// 读取 `source` 的最新心跳，从未写入时返回 `None`
    async fn read(&self, source: &str) -> Result<Option<HeartbeatRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = HeartbeatRecord::new(SCHEDULER_SOURCE, ts);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("scheduler"));
        assert!(json.contains("2024-05-01T12:00:00Z"));

        let decoded: HeartbeatRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }
}
