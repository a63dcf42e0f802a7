/// Register Defaults Use Case
///
/// Populates a registry with the built-in checks and metrics during the
/// initialization phase. Checks that need an external dependency are only
/// registered when the host supplies that dependency in `Collaborators`.
/// The queue liveness check only reads the heartbeat store, so it is also
/// registered when `checks.queue_liveness` is set and the queue worker runs
/// in another process.
///
/// ## Order
/// Checks: database, queue, queue_backlog, cache, keystore, keystore_memory,
/// storage, debug_mode, job_dashboard, env, scheduler, disk_space.
/// Metrics: memory_usage, cpu_load, disk_usage, database_size, log_file_size.
///
/// ## Example
/// ```rust,ignore
/// let collaborators = Collaborators::new(store).with_database(db);
/// RegisterDefaultsUseCase::new(&config, collaborators).execute(&mut registry);
/// ```

use crate::application::services::registry::HealthCheckRegistry;
use crate::domain::heartbeat::HeartbeatStore;
use crate::domain::job::JobQueue;
use crate::infrastructure::checks::{
    CacheCheck, CacheStore, DatabaseCheck, DatabaseConnection, DebugModeCheck, DiskSpaceCheck,
    EnvCheck, JobDashboard, JobDashboardCheck, KeyValueStore, KeystoreCheck, KeystoreMemoryCheck,
    QueueBacklogCheck, QueueCheck, QueueConnection, SchedulerCheck, StorageCheck,
};
use crate::infrastructure::metrics::{
    CpuLoadMetric, DatabaseSizeMetric, DiskUsageMetric, LogFileSizeMetric, MemoryUsageMetric,
};
use crate::shared::config::HealthConfig;
use crate::shared::timestamp::{system_clock, SharedClock};
use std::sync::Arc;
use tracing::info;

/// 宿主提供的外部依赖
#[derive(Clone)]
pub struct Collaborators {
    pub heartbeat_store: Arc<dyn HeartbeatStore>,
    pub clock: SharedClock,
    pub database: Option<Arc<dyn DatabaseConnection>>,
    /// 提供后注册队列存活检查（或开启 `checks.queue_liveness`）
    pub job_queue: Option<Arc<dyn JobQueue>>,
    pub queue_connection: Option<Arc<dyn QueueConnection>>,
    pub cache: Option<Arc<dyn CacheStore>>,
    pub keystore: Option<Arc<dyn KeyValueStore>>,
    pub job_dashboard: Option<Arc<dyn JobDashboard>>,
}

impl Collaborators {
    pub fn new(heartbeat_store: Arc<dyn HeartbeatStore>) -> Self {
        Self {
            heartbeat_store,
            clock: system_clock(),
            database: None,
            job_queue: None,
            queue_connection: None,
            cache: None,
            keystore: None,
            job_dashboard: None,
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_database(mut self, database: Arc<dyn DatabaseConnection>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_job_queue(mut self, queue: Arc<dyn JobQueue>) -> Self {
        self.job_queue = Some(queue);
        self
    }

    pub fn with_queue_connection(mut self, connection: Arc<dyn QueueConnection>) -> Self {
        self.queue_connection = Some(connection);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_keystore(mut self, keystore: Arc<dyn KeyValueStore>) -> Self {
        self.keystore = Some(keystore);
        self
    }

    pub fn with_job_dashboard(mut self, dashboard: Arc<dyn JobDashboard>) -> Self {
        self.job_dashboard = Some(dashboard);
        self
    }
}

/// 默认注册结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRegistration {
    pub checks: usize,
    pub metrics: usize,
}

/// 注册默认检查和指标
pub struct RegisterDefaultsUseCase<'a> {
    config: &'a HealthConfig,
    collaborators: Collaborators,
}

impl<'a> RegisterDefaultsUseCase<'a> {
    pub fn new(config: &'a HealthConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// 执行注册，`register_defaults = false` 时不做任何事
    pub fn execute(self, registry: &mut HealthCheckRegistry) -> DefaultRegistration {
        if !self.config.register_defaults {
            info!("默认检查注册已禁用");
            return DefaultRegistration::default();
        }

        let checks_before = registry.checks().len();
        let metrics_before = registry.metrics().len();

        let c = &self.collaborators;
        let settings = &self.config.checks;
        let threshold = self.config.heartbeat.threshold();

        if let Some(database) = &c.database {
            registry.register_check(DatabaseCheck::new(database.clone()));
        }
        if c.job_queue.is_some() || settings.queue_liveness {
            registry.register_check(
                QueueCheck::new(c.heartbeat_store.clone())
                    .with_threshold(threshold)
                    .with_clock(c.clock.clone()),
            );
        }
        if let Some(connection) = &c.queue_connection {
            registry.register_check(QueueBacklogCheck::new(
                connection.clone(),
                settings.queue_backlog_warning,
                settings.queue_backlog_critical,
            ));
        }
        if let Some(cache) = &c.cache {
            registry.register_check(CacheCheck::new(cache.clone()));
        }
        if let Some(keystore) = &c.keystore {
            registry
                .register_check(KeystoreCheck::new(keystore.clone()))
                .register_check(KeystoreMemoryCheck::new(
                    keystore.clone(),
                    settings.keystore_warning_percent,
                    settings.keystore_critical_percent,
                ));
        }
        registry
            .register_check(StorageCheck::new(settings.storage_dir.clone()))
            .register_check(DebugModeCheck::new(
                settings.debug,
                settings.environment.clone(),
            ));
        if let Some(dashboard) = &c.job_dashboard {
            registry.register_check(JobDashboardCheck::new(dashboard.clone()));
        }
        registry
            .register_check(EnvCheck::new(settings.required_env.clone()))
            .register_check(
                SchedulerCheck::new(c.heartbeat_store.clone())
                    .with_threshold(threshold)
                    .with_clock(c.clock.clone()),
            )
            .register_check(DiskSpaceCheck::new(
                settings.disk_path.clone(),
                settings.disk_warning_percent,
                settings.disk_critical_percent,
            ));

        registry
            .register_metric(MemoryUsageMetric::new())
            .register_metric(CpuLoadMetric::new())
            .register_metric(DiskUsageMetric::new(settings.disk_path.clone()));
        if let Some(database) = &c.database {
            registry.register_metric(DatabaseSizeMetric::new(database.clone()));
        }
        registry.register_metric(LogFileSizeMetric::new(settings.log_file.clone()));

        let registered = DefaultRegistration {
            checks: registry.checks().len() - checks_before,
            metrics: registry.metrics().len() - metrics_before,
        };
        info!(
            "已注册默认检查 {} 个，指标 {} 个",
            registered.checks, registered.metrics
        );
        registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check::Capability;
    use crate::infrastructure::checks::database::tests::FakeDatabase;
    use crate::infrastructure::persistence::InMemoryHeartbeatStore;
    use crate::infrastructure::queue::InProcessJobQueue;

    fn names(registry: &HealthCheckRegistry) -> Vec<String> {
        registry.checks().iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_self_contained_defaults() {
        let mut registry = HealthCheckRegistry::new();
        let collaborators = Collaborators::new(Arc::new(InMemoryHeartbeatStore::new()));

        let registered = RegisterDefaultsUseCase::new(&HealthConfig::default(), collaborators)
            .execute(&mut registry);

        assert_eq!(
            names(&registry),
            vec!["storage", "debug_mode", "env", "scheduler", "disk_space"]
        );
        assert_eq!(registered.checks, 5);
        assert_eq!(registered.metrics, 4);
        assert!(!registry.has_capability(Capability::QueueLiveness));
    }

    #[test]
    fn test_full_defaults_order() {
        let mut registry = HealthCheckRegistry::new();
        let (queue, _receiver) = InProcessJobQueue::new(8);
        let queue = Arc::new(queue);
        let collaborators = Collaborators::new(Arc::new(InMemoryHeartbeatStore::new()))
            .with_database(Arc::new(FakeDatabase { reachable: true, size: 0 }))
            .with_job_queue(queue.clone())
            .with_queue_connection(queue);

        let registered = RegisterDefaultsUseCase::new(&HealthConfig::default(), collaborators)
            .execute(&mut registry);

        assert_eq!(
            names(&registry),
            vec![
                "database",
                "queue",
                "queue_backlog",
                "storage",
                "debug_mode",
                "env",
                "scheduler",
                "disk_space"
            ]
        );
        assert_eq!(registered.metrics, 5);
        assert!(registry.has_capability(Capability::QueueLiveness));
    }

    #[test]
    fn test_queue_liveness_without_job_queue() {
        let mut registry = HealthCheckRegistry::new();
        let mut config = HealthConfig::default();
        config.checks.queue_liveness = true;
        let collaborators = Collaborators::new(Arc::new(InMemoryHeartbeatStore::new()));

        RegisterDefaultsUseCase::new(&config, collaborators).execute(&mut registry);

        assert_eq!(
            names(&registry),
            vec!["queue", "storage", "debug_mode", "env", "scheduler", "disk_space"]
        );
        assert!(registry.has_capability(Capability::QueueLiveness));
    }

    #[test]
    fn test_disabled_defaults() {
        let mut registry = HealthCheckRegistry::new();
        let config = HealthConfig {
            register_defaults: false,
            ..Default::default()
        };
        let collaborators = Collaborators::new(Arc::new(InMemoryHeartbeatStore::new()));

        let registered =
            RegisterDefaultsUseCase::new(&config, collaborators).execute(&mut registry);
        assert_eq!(registered, DefaultRegistration::default());
        assert!(registry.checks().is_empty());
    }
}
