/// Application Layer - Registry, Heartbeats and Bootstrapping
///
/// This layer orchestrates the domain contracts: it runs registered probes,
/// aggregates their results, plans the heartbeat producers and registers
/// the default probes at boot. It only sees probes through the `Check` and
/// `Metric` traits.
///
/// ## Modules
/// - `services`: HealthCheckRegistry, heartbeat producers and schedule
/// - `use_cases`: boot-time registration of default probes
/// - `dto`: the aggregated HealthReport

pub mod dto;
pub mod services;
pub mod use_cases;

// Re-export key services
pub use dto::HealthReport;
pub use services::{HealthCheckRegistry, HeartbeatSchedule};
pub use use_cases::{Collaborators, RegisterDefaultsUseCase};
