/// 内存键值存储检查
///
/// - `KeystoreCheck`: 连通性
/// - `KeystoreMemoryCheck`: 内存压力（已用 / 上限）

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 键值存储的内存信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystoreMemory {
    pub used_bytes: u64,
    /// 内存上限，0 表示不限制
    pub max_bytes: u64,
}

/// 内存键值存储（由宿主实现）
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn ping(&self) -> Result<(), CheckError>;

    async fn memory(&self) -> Result<KeystoreMemory, CheckError>;
}

/// 键值存储连通性检查
pub struct KeystoreCheck {
    store: Arc<dyn KeyValueStore>,
}

impl KeystoreCheck {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Check for KeystoreCheck {
    fn name(&self) -> &str {
        "keystore"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        Ok(match self.store.ping().await {
            Ok(()) => CheckResult::ok(self.name(), "Keystore connection is working"),
            Err(e) => CheckResult::critical(
                self.name(),
                format!("Could not connect to the keystore: {}", e),
            ),
        })
    }
}

/// 键值存储内存压力检查
pub struct KeystoreMemoryCheck {
    store: Arc<dyn KeyValueStore>,
    warning_percent: f64,
    critical_percent: f64,
}

impl KeystoreMemoryCheck {
    pub fn new(store: Arc<dyn KeyValueStore>, warning_percent: f64, critical_percent: f64) -> Self {
        Self {
            store,
            warning_percent,
            critical_percent,
        }
    }
}

#[async_trait]
impl Check for KeystoreMemoryCheck {
    fn name(&self) -> &str {
        "keystore_memory"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let memory = self.store.memory().await?;

        if memory.max_bytes == 0 {
            return Ok(CheckResult::ok(self.name(), "No memory limit configured")
                .with_detail("used_bytes", memory.used_bytes));
        }

        let percent = memory.used_bytes as f64 / memory.max_bytes as f64 * 100.0;
        let message = format!("Memory usage at {:.1}%", percent);
        let result = if percent >= self.critical_percent {
            CheckResult::critical(self.name(), message)
        } else if percent >= self.warning_percent {
            CheckResult::warning(self.name(), message)
        } else {
            CheckResult::ok(self.name(), message)
        };

        Ok(result
            .with_detail("used_bytes", memory.used_bytes)
            .with_detail("max_bytes", memory.max_bytes)
            .with_detail("used_percent", (percent * 10.0).round() / 10.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Status;

    struct FakeKeystore {
        reachable: bool,
        memory: KeystoreMemory,
    }

    #[async_trait]
    impl KeyValueStore for FakeKeystore {
        async fn ping(&self) -> Result<(), CheckError> {
            if self.reachable {
                Ok(())
            } else {
                Err(CheckError::Unreachable("no route to host".to_string()))
            }
        }

        async fn memory(&self) -> Result<KeystoreMemory, CheckError> {
            if self.reachable {
                Ok(self.memory)
            } else {
                Err(CheckError::Unreachable("no route to host".to_string()))
            }
        }
    }

    fn keystore(used: u64, max: u64) -> Arc<FakeKeystore> {
        Arc::new(FakeKeystore {
            reachable: true,
            memory: KeystoreMemory { used_bytes: used, max_bytes: max },
        })
    }

    #[tokio::test]
    async fn test_ping() {
        let ok = KeystoreCheck::new(keystore(0, 0)).run().await.unwrap();
        assert_eq!(ok.status, Status::Ok);

        let down = Arc::new(FakeKeystore {
            reachable: false,
            memory: KeystoreMemory { used_bytes: 0, max_bytes: 0 },
        });
        let result = KeystoreCheck::new(down).run().await.unwrap();
        assert_eq!(result.status, Status::Critical);
    }

    #[tokio::test]
    async fn test_memory_thresholds() {
        let status = |used| async move {
            KeystoreMemoryCheck::new(keystore(used, 100), 80.0, 90.0)
                .run()
                .await
                .unwrap()
                .status
        };

        assert_eq!(status(50).await, Status::Ok);
        assert_eq!(status(80).await, Status::Warning);
        assert_eq!(status(95).await, Status::Critical);
    }

    #[tokio::test]
    async fn test_unlimited_memory_is_ok() {
        let result = KeystoreMemoryCheck::new(keystore(1 << 30, 0), 80.0, 90.0)
            .run()
            .await
            .unwrap();
        assert_eq!(result.status, Status::Ok);
    }

    #[tokio::test]
    async fn test_memory_error_propagates() {
        let down = Arc::new(FakeKeystore {
            reachable: false,
            memory: KeystoreMemory { used_bytes: 0, max_bytes: 0 },
        });
        let result = KeystoreMemoryCheck::new(down, 80.0, 90.0).run().await;
        assert!(result.is_err());
    }
}
