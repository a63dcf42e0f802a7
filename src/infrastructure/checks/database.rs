/// 数据库连通性检查

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 数据库连接（由宿主实现）
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// 执行一次最小往返（例如 `SELECT 1`）
    async fn ping(&self) -> Result<(), CheckError>;

    /// 数据库占用空间（字节）
    async fn size_bytes(&self) -> Result<u64, CheckError>;
}

/// 数据库连通性检查
pub struct DatabaseCheck {
    name: String,
    connection: Arc<dyn DatabaseConnection>,
}

impl DatabaseCheck {
    pub fn new(connection: Arc<dyn DatabaseConnection>) -> Self {
        Self::named("database", connection)
    }

    /// 多个连接时使用不同名称
    pub fn named(name: impl Into<String>, connection: Arc<dyn DatabaseConnection>) -> Self {
        Self {
            name: name.into(),
            connection,
        }
    }
}

#[async_trait]
impl Check for DatabaseCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        Ok(match self.connection.ping().await {
            Ok(()) => CheckResult::ok(&self.name, "Database connection is working"),
            Err(e) => CheckResult::critical(
                &self.name,
                format!("Could not connect to the database: {}", e),
            ),
        })
    }
}
