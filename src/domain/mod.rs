/// Domain Layer - Health Model and Capability Contracts
///
/// Pure types shared by every other layer: the severity scale, the outcome of
/// a single probe, metric readings, and the traits a probe or a heartbeat
/// backend must implement. Nothing here performs I/O.
///
/// ## Modules
/// - `status`: Status, CheckResult, MetricReading
/// - `check`: Check / Metric contracts and CheckError
/// - `heartbeat`: HeartbeatStore contract and HeartbeatRecord
/// - `job`: queue heartbeat job and the JobQueue contract

pub mod check;
pub mod heartbeat;
pub mod job;
pub mod status;

// Re-export key types
pub use check::{Capability, Check, CheckError, Metric};
pub use heartbeat::{HeartbeatRecord, HeartbeatStore, StoreError, QUEUE_SOURCE, SCHEDULER_SOURCE};
pub use job::{HeartbeatJob, JobQueue, QueueError};
pub use status::{CheckResult, MetricReading, MetricValue, Scalar, Status};
