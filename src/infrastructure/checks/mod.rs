/// 内置健康检查
///
/// 每个检查都是独立的 `Check` 实现，注册表不了解其内部细节。
/// 需要外部依赖的检查通过各自的连接trait接入宿主：
/// - `DatabaseConnection` (database)
/// - `QueueConnection` (queue_backlog)
/// - `CacheStore` (cache)
/// - `KeyValueStore` (keystore, keystore_memory)
/// - `JobDashboard` (job_dashboard)

pub mod cache;
pub mod dashboard;
pub mod database;
pub mod debug_mode;
pub mod disk_space;
pub mod env;
pub mod keystore;
pub mod liveness;
pub mod queue;
pub mod storage;

pub use cache::{CacheCheck, CacheStore};
pub use dashboard::{DashboardStatus, JobDashboard, JobDashboardCheck};
pub use database::{DatabaseCheck, DatabaseConnection};
pub use debug_mode::DebugModeCheck;
pub use disk_space::{disk_usage, DiskSpaceCheck, DiskUsage};
pub use env::EnvCheck;
pub use keystore::{KeyValueStore, KeystoreCheck, KeystoreMemory, KeystoreMemoryCheck};
pub use liveness::{LivenessCheck, QueueCheck, SchedulerCheck};
pub use queue::{QueueBacklogCheck, QueueConnection};
pub use storage::StorageCheck;
