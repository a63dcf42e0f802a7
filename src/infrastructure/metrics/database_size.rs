/// 数据库大小 (MB)

use super::bytes_to_mb;
use crate::domain::check::{CheckError, Metric};
use crate::domain::status::MetricReading;
use crate::infrastructure::checks::database::DatabaseConnection;
use async_trait::async_trait;
use std::sync::Arc;

pub struct DatabaseSizeMetric {
    connection: Arc<dyn DatabaseConnection>,
}

impl DatabaseSizeMetric {
    pub fn new(connection: Arc<dyn DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Metric for DatabaseSizeMetric {
    fn name(&self) -> &str {
        "database_size"
    }

    async fn value(&self) -> Result<MetricReading, CheckError> {
        let bytes = self.connection.size_bytes().await?;
        Ok(MetricReading::new(self.name(), bytes_to_mb(bytes)).with_unit("MB"))
    }
}
