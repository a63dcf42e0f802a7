/// 内置指标
///
/// 指标只做观测，不影响总体状态。
/// - `system`: 内存使用率、CPU 负载、磁盘使用率 (sysinfo)
/// - `database_size`: 数据库大小
/// - `log_file_size`: 日志文件大小

pub mod database_size;
pub mod log_file_size;
pub mod system;

pub use database_size::DatabaseSizeMetric;
pub use log_file_size::LogFileSizeMetric;
pub use system::{CpuLoadMetric, DiskUsageMetric, MemoryUsageMetric};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 字节换算为 MB，保留两位小数
pub(crate) fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

/// 百分比保留一位小数
pub(crate) fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
