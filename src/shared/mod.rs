/// Shared utilities used across all layers
///
/// This module contains:
/// - Clock abstraction (system / manual)
/// - Configuration model
/// - Prometheus instrumentation of the health service itself

pub mod config;
pub mod metrics;
pub mod timestamp;

// Re-export commonly used types
pub use config::{ChecksConfig, ConfigError, HealthConfig, HeartbeatConfig, RouteMiddleware};
pub use metrics::METRICS;
pub use timestamp::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
