/// 缓存读写往返检查
///
/// 写入一个临时键，读回比较，最后删除。

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static PROBE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 探测键的存活时间
const PROBE_TTL: Duration = Duration::from_secs(10);

/// 缓存存储（由宿主实现）
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CheckError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CheckError>;

    async fn forget(&self, key: &str) -> Result<(), CheckError>;
}

/// 缓存检查
pub struct CacheCheck {
    store: Arc<dyn CacheStore>,
}

impl CacheCheck {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    fn probe_key() -> (String, String) {
        let seq = PROBE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nonce = format!("{}-{}", std::process::id(), seq);
        (format!("vigilant-health:cache-check:{}", nonce), nonce)
    }
}

#[async_trait]
impl Check for CacheCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let (key, value) = Self::probe_key();

        if let Err(e) = self.store.put(&key, &value, PROBE_TTL).await {
            return Ok(CheckResult::critical(
                self.name(),
                format!("Could not write to the cache: {}", e),
            ));
        }

        let read = self.store.get(&key).await;
        // 读取失败也尽量清理
        let _ = self.store.forget(&key).await;

        Ok(match read {
            Ok(Some(found)) if found == value => {
                CheckResult::ok(self.name(), "Cache is working")
            }
            Ok(Some(_)) => CheckResult::critical(self.name(), "Cache returned a different value"),
            Ok(None) => {
                CheckResult::critical(self.name(), "Cache did not return the written value")
            }
            Err(e) => CheckResult::critical(
                self.name(),
                format!("Could not read from the cache: {}", e),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Status;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, String>>,
        drop_writes: bool,
        fail_reads: bool,
    }

    #[async_trait]
    impl CacheStore for MapCache {
        async fn put(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CheckError> {
            if !self.drop_writes {
                self.entries.lock().insert(key.to_string(), value.to_string());
            }
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<String>, CheckError> {
            if self.fail_reads {
                return Err(CheckError::Unreachable("cache offline".to_string()));
            }
            Ok(self.entries.lock().get(key).cloned())
        }

        async fn forget(&self, key: &str) -> Result<(), CheckError> {
            self.entries.lock().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_round_trip_ok_and_cleans_up() {
        let cache = Arc::new(MapCache::default());
        let check = CacheCheck::new(cache.clone());

        let result = check.run().await.unwrap();
        assert_eq!(result.status, Status::Ok);
        assert!(cache.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_lost_write_is_critical() {
        let cache = Arc::new(MapCache {
            drop_writes: true,
            ..Default::default()
        });
        let result = CacheCheck::new(cache).run().await.unwrap();
        assert_eq!(result.status, Status::Critical);
    }

    #[tokio::test]
    async fn test_read_failure_is_critical() {
        let cache = Arc::new(MapCache {
            fail_reads: true,
            ..Default::default()
        });
        let result = CacheCheck::new(cache.clone()).run().await.unwrap();
        assert_eq!(result.status, Status::Critical);
        assert!(result.message.contains("cache offline"));
        assert!(cache.entries.lock().is_empty());
    }

    #[test]
    fn test_probe_keys_are_unique() {
        let (a, _) = CacheCheck::probe_key();
        let (b, _) = CacheCheck::probe_key();
        assert_ne!(a, b);
    }
}
