/// Application Services
///
/// - `registry`: check/metric registry, execution and aggregation
/// - `heartbeat`: heartbeat producers and boot-time schedule planning

pub mod heartbeat;
pub mod registry;

pub use heartbeat::{
    HeartbeatError, HeartbeatProducer, HeartbeatSchedule, QueueHeartbeat, SchedulerHeartbeat,
};
pub use registry::{HealthCheckRegistry, DEFAULT_PROBE_TIMEOUT};
