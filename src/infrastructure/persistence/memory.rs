/// 进程内心跳存储
///
/// 只在单个进程内可见，适用于调度器、队列工作进程与 web 服务
/// 运行在同一进程的部署，以及测试。

use crate::domain::heartbeat::{HeartbeatRecord, HeartbeatStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// 进程内心跳存储，克隆共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct InMemoryHeartbeatStore {
    records: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl InMemoryHeartbeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已有记录的来源数量
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HeartbeatStore for InMemoryHeartbeatStore {
    async fn write(&self, source: &str, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        self.records.write().insert(source.to_string(), timestamp);
        Ok(())
    }

    async fn read(&self, source: &str) -> Result<Option<HeartbeatRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .get(source)
            .map(|ts| HeartbeatRecord::new(source, *ts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_write_and_read() {
        let store = InMemoryHeartbeatStore::new();
        assert!(store.is_empty());
        assert!(store.read("scheduler").await.unwrap().is_none());

        let now = Utc::now();
        store.write("scheduler", now).await.unwrap();
        assert_eq!(store.read("scheduler").await.unwrap().unwrap().timestamp, now);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_single_record() {
        let store = InMemoryHeartbeatStore::new();
        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(60);

        store.write("queue", t1).await.unwrap();
        store.write("queue", t2).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.read("queue").await.unwrap().unwrap().timestamp, t2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryHeartbeatStore::new();
        let other = store.clone();

        other.write("scheduler", Utc::now()).await.unwrap();
        assert!(store.read("scheduler").await.unwrap().is_some());
    }
}
