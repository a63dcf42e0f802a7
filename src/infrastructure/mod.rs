/// Infrastructure Layer - Technical Implementations
///
/// This layer contains all technical implementations that interact with
/// external systems: the filesystem, system statistics, job queues and HTTP.
///
/// The infrastructure layer depends on the domain layer but the domain
/// layer does not depend on infrastructure (dependency inversion).
///
/// ## Modules
/// - `checks`: built-in Check implementations
/// - `metrics`: built-in Metric implementations
/// - `persistence`: heartbeat stores (file, in-memory)
/// - `queue`: in-process job queue and queue worker
/// - `observability`: HTTP report endpoint and Prometheus export

pub mod checks;
pub mod metrics;
pub mod observability;
pub mod persistence;
pub mod queue;

// Re-export key types
pub use observability::{build_router, HealthServer};
pub use persistence::{FileHeartbeatStore, InMemoryHeartbeatStore};
pub use queue::{InProcessJobQueue, QueueWorker};
