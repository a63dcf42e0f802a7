/// CLI Interface Module
///
/// This module provides the command-line interface of the health service.
/// It is the host-side glue around the core: it loads configuration, wires
/// the collaborators, and owns the timers the core deliberately does not.
///
/// ## Commands
/// - `serve`: expose the report endpoint (optionally with in-process
///   heartbeat timers and queue worker)
/// - `heartbeat <source>`: write one heartbeat, for an external cron
/// - `check`: run the registry once and print the JSON report

use crate::application::dto::HealthReport;
use crate::application::services::{
    HealthCheckRegistry, HeartbeatError, HeartbeatProducer, HeartbeatSchedule, SchedulerHeartbeat,
};
use crate::application::use_cases::{Collaborators, RegisterDefaultsUseCase};
use crate::domain::heartbeat::{HeartbeatStore, QUEUE_SOURCE, SCHEDULER_SOURCE};
use crate::domain::job::{HeartbeatJob, JobQueue};
use crate::domain::status::Status;
use crate::infrastructure::observability::{HealthServer, ServerError};
use crate::infrastructure::persistence::FileHeartbeatStore;
use crate::infrastructure::queue::{InProcessJobQueue, QueueWorker, DEFAULT_QUEUE_CAPACITY};
use crate::shared::config::{ConfigError, HealthConfig};
use crate::shared::timestamp::{system_clock, Clock, SharedClock};
use clap::{Args, Parser, Subcommand};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;

/// 健康检查服务命令行配置
#[derive(Parser, Debug, Clone)]
#[command(name = "vigilant-health")]
#[command(version)]
#[command(about = "应用健康检查与心跳存活服务", long_about = None)]
pub struct CliConfig {
    /// JSON 配置文件
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// 心跳存储目录（覆盖配置文件）
    #[arg(long, global = true)]
    pub heartbeat_dir: Option<PathBuf>,

    /// 注册队列存活检查（队列工作进程在其他进程中运行时使用）
    #[arg(long, global = true, default_value_t = false)]
    pub queue_liveness: bool,

    /// 日志级别
    #[arg(
        short = 'l',
        long,
        global = true,
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 启动健康检查HTTP服务
    Serve(ServeArgs),

    /// 写入一次心跳（供外部定时任务调用）
    Heartbeat {
        /// 心跳来源
        #[arg(value_parser = [SCHEDULER_SOURCE, QUEUE_SOURCE])]
        source: String,
    },

    /// 执行一次全部检查并输出 JSON 报告
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// 服务器监听地址
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// 服务器监听端口
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// 路由前缀（覆盖配置文件）
    #[arg(long)]
    pub prefix: Option<String>,

    /// 不注册健康检查路由
    #[arg(long, default_value_t = false)]
    pub no_route: bool,

    /// 不注册心跳定时任务
    #[arg(long, default_value_t = false)]
    pub no_schedule: bool,

    /// 不自动注册默认检查
    #[arg(long, default_value_t = false)]
    pub no_defaults: bool,

    /// 在本进程内按间隔触发心跳生产者
    #[arg(long, default_value_t = false)]
    pub with_scheduler: bool,

    /// 在本进程内运行队列工作进程（同时注册队列存活检查，需配合 `--with-scheduler`）
    #[arg(long, default_value_t = false)]
    pub with_queue_worker: bool,
}

/// CLI 错误
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Heartbeat(#[from] HeartbeatError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

/// Runs the CLI application
///
/// Parses command-line arguments, then dispatches to the subcommand.
pub async fn run() -> ExitCode {
    let cli = CliConfig::parse();
    init_logging(&cli.log_level);

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: CliConfig) -> Result<ExitCode, CliError> {
    let config = load_config(&cli)?;
    tracing::debug!("配置: {:?}", config);

    match cli.command {
        Command::Serve(args) => {
            serve(config, args).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Heartbeat { source } => {
            heartbeat(&config, &source).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => check_once(&config).await,
    }
}

/// 加载配置文件并应用命令行覆盖
pub fn load_config(cli: &CliConfig) -> Result<HealthConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => HealthConfig::from_file(path)?,
        None => HealthConfig::default(),
    };
    if let Some(dir) = &cli.heartbeat_dir {
        config.heartbeat.store_dir = dir.clone();
    }
    if cli.queue_liveness {
        config.checks.queue_liveness = true;
    }
    if let Command::Serve(args) = &cli.command {
        apply_serve_overrides(&mut config, args);
        // 进程内队列只能由本进程的心跳定时器投递
        if args.with_queue_worker && !(args.with_scheduler && config.register_schedule) {
            return Err(ConfigError::Invalid {
                field: "with_queue_worker",
                reason: "the in-process queue worker only receives jobs from the in-process \
                         heartbeat timer; use --with-scheduler and keep the schedule enabled"
                    .to_string(),
            });
        }
    }
    config.validate()?;
    Ok(config)
}

fn apply_serve_overrides(config: &mut HealthConfig, args: &ServeArgs) {
    if let Some(prefix) = &args.prefix {
        config.route_prefix = prefix.clone();
    }
    if args.no_route {
        config.register_route = false;
    }
    if args.no_schedule {
        config.register_schedule = false;
    }
    if args.no_defaults {
        config.register_defaults = false;
    }
}

/// 组装注册表
fn build_registry(
    config: &HealthConfig,
    store: Arc<dyn HeartbeatStore>,
    clock: SharedClock,
    queue: Option<Arc<InProcessJobQueue>>,
) -> HealthCheckRegistry {
    let mut registry = HealthCheckRegistry::new()
        .with_probe_timeout(config.probe_timeout())
        .with_clock(clock.clone());

    let mut collaborators = Collaborators::new(store).with_clock(clock);
    if let Some(queue) = queue {
        collaborators = collaborators
            .with_job_queue(queue.clone())
            .with_queue_connection(queue);
    }
    RegisterDefaultsUseCase::new(config, collaborators).execute(&mut registry);
    registry
}

async fn serve(config: HealthConfig, args: ServeArgs) -> Result<(), CliError> {
    let clock = system_clock();
    let store: Arc<dyn HeartbeatStore> =
        Arc::new(FileHeartbeatStore::new(config.heartbeat.store_dir.clone()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut queue = None;
    if args.with_queue_worker {
        let (job_queue, receiver) = InProcessJobQueue::new(DEFAULT_QUEUE_CAPACITY);
        let worker = QueueWorker::new(receiver, store.clone(), clock.clone());
        tokio::spawn(worker.run());
        queue = Some(Arc::new(job_queue));
    }

    let registry = build_registry(&config, store.clone(), clock.clone(), queue.clone());

    if args.with_scheduler {
        let job_queue = queue.map(|q| q as Arc<dyn JobQueue>);
        let schedule = HeartbeatSchedule::plan(&registry, &config, store, job_queue, clock);
        tokio::spawn(schedule.run(wait_for_shutdown(shutdown_rx.clone())));
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("收到退出信号");
        }
        let _ = shutdown_tx.send(true);
    });

    let addr = SocketAddr::new(args.host, args.port);
    HealthServer::new(addr, Arc::new(registry), &config)
        .run(wait_for_shutdown(shutdown_rx))
        .await?;
    Ok(())
}

async fn heartbeat(config: &HealthConfig, source: &str) -> Result<(), CliError> {
    let store: Arc<dyn HeartbeatStore> =
        Arc::new(FileHeartbeatStore::new(config.heartbeat.store_dir.clone()));
    let clock = system_clock();

    if source == QUEUE_SOURCE {
        // 由宿主的队列工作进程调用，等同于处理一个心跳任务
        HeartbeatJob::queue()
            .handle(store.as_ref(), clock.now())
            .await
            .map_err(HeartbeatError::from)?;
    } else {
        SchedulerHeartbeat::new(store, clock).tick().await?;
    }
    tracing::info!("心跳已写入: {}", source);
    Ok(())
}

/// 基于共享心跳目录执行一次全部检查
async fn report_once(config: &HealthConfig) -> HealthReport {
    let store: Arc<dyn HeartbeatStore> =
        Arc::new(FileHeartbeatStore::new(config.heartbeat.store_dir.clone()));
    build_registry(config, store, system_clock(), None).run().await
}

async fn check_once(config: &HealthConfig) -> Result<ExitCode, CliError> {
    let report = report_once(config).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.status == Status::Critical {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn wait_for_shutdown(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

/// 初始化日志系统
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check::Capability;
    use crate::infrastructure::persistence::InMemoryHeartbeatStore;

    #[test]
    fn test_serve_defaults() {
        let cli = CliConfig::parse_from(["vigilant-health", "serve"]);
        assert_eq!(cli.log_level, "info");
        assert!(cli.config.is_none());

        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host.to_string(), "127.0.0.1");
        assert_eq!(args.port, 8080);
        assert!(!args.no_route);
        assert!(!args.with_scheduler);
        assert!(!args.with_queue_worker);
    }

    #[test]
    fn test_serve_custom() {
        let cli = CliConfig::parse_from([
            "vigilant-health",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--prefix",
            "internal",
            "--no-defaults",
            "--with-scheduler",
            "--with-queue-worker",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level, "debug");

        let config = load_config(&cli).unwrap();
        assert_eq!(config.health_path(), "/internal/health");
        assert!(!config.register_defaults);
        assert!(config.register_schedule);
        assert!(config.register_route);

        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 9000);
        assert!(args.with_scheduler);
        assert!(args.with_queue_worker);
    }

    #[test]
    fn test_queue_worker_requires_in_process_schedule() {
        let cli = CliConfig::parse_from(["vigilant-health", "serve", "--with-queue-worker"]);
        assert!(matches!(
            load_config(&cli),
            Err(ConfigError::Invalid { field: "with_queue_worker", .. })
        ));

        let cli = CliConfig::parse_from([
            "vigilant-health",
            "serve",
            "--with-queue-worker",
            "--with-scheduler",
            "--no-schedule",
        ]);
        assert!(matches!(
            load_config(&cli),
            Err(ConfigError::Invalid { field: "with_queue_worker", .. })
        ));

        let cli = CliConfig::parse_from([
            "vigilant-health",
            "serve",
            "--with-queue-worker",
            "--with-scheduler",
        ]);
        assert!(load_config(&cli).is_ok());
    }

    #[tokio::test]
    async fn test_queue_worker_with_scheduler_reports_queue_ok() {
        let store: Arc<dyn HeartbeatStore> = Arc::new(InMemoryHeartbeatStore::new());
        let clock = system_clock();
        let (queue, receiver) = InProcessJobQueue::new(8);
        let queue = Arc::new(queue);
        let mut worker = QueueWorker::new(receiver, store.clone(), clock.clone());

        let config = HealthConfig::default();
        let registry = build_registry(&config, store.clone(), clock.clone(), Some(queue.clone()));
        let schedule = HeartbeatSchedule::plan(
            &registry,
            &config,
            store,
            Some(queue as Arc<dyn JobQueue>),
            clock,
        );
        assert_eq!(schedule.sources(), vec![SCHEDULER_SOURCE, QUEUE_SOURCE]);

        schedule.tick_all().await;
        assert_eq!(worker.drain().await, 1);

        let report = registry.run().await;
        assert_eq!(report.check("queue").unwrap().status, Status::Ok);
    }

    #[tokio::test]
    async fn test_check_reads_external_queue_heartbeat() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliConfig::parse_from([
            "vigilant-health",
            "check",
            "--queue-liveness",
            "--heartbeat-dir",
            dir.path().to_str().unwrap(),
        ]);
        let mut config = load_config(&cli).unwrap();
        config.checks.storage_dir = dir.path().to_path_buf();
        assert!(config.checks.queue_liveness);

        let report = report_once(&config).await;
        assert_eq!(report.check("queue").unwrap().status, Status::Critical);

        heartbeat(&config, QUEUE_SOURCE).await.unwrap();

        let report = report_once(&config).await;
        assert_eq!(report.check("queue").unwrap().status, Status::Ok);
    }

    #[test]
    fn test_heartbeat_source_validation() {
        let cli = CliConfig::parse_from(["vigilant-health", "heartbeat", "scheduler"]);
        assert!(matches!(
            cli.command,
            Command::Heartbeat { ref source } if source == "scheduler"
        ));

        assert!(CliConfig::try_parse_from(["vigilant-health", "heartbeat", "cron"]).is_err());
    }

    #[test]
    fn test_heartbeat_dir_override() {
        let cli = CliConfig::parse_from([
            "vigilant-health",
            "check",
            "--heartbeat-dir",
            "/tmp/beats",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.heartbeat.store_dir, PathBuf::from("/tmp/beats"));
    }

    #[test]
    fn test_build_registry_with_queue_worker() {
        let store: Arc<dyn HeartbeatStore> = Arc::new(InMemoryHeartbeatStore::new());
        let (queue, _receiver) = InProcessJobQueue::new(8);
        let registry = build_registry(
            &HealthConfig::default(),
            store.clone(),
            system_clock(),
            Some(Arc::new(queue)),
        );
        assert!(registry.has_capability(Capability::QueueLiveness));

        let registry = build_registry(&HealthConfig::default(), store, system_clock(), None);
        assert!(!registry.has_capability(Capability::QueueLiveness));
    }

    #[tokio::test]
    async fn test_heartbeat_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HealthConfig::default();
        config.heartbeat.store_dir = dir.path().to_path_buf();

        heartbeat(&config, SCHEDULER_SOURCE).await.unwrap();
        heartbeat(&config, QUEUE_SOURCE).await.unwrap();

        let store = FileHeartbeatStore::new(dir.path());
        assert!(store.read(SCHEDULER_SOURCE).await.unwrap().is_some());
        assert!(store.read(QUEUE_SOURCE).await.unwrap().is_some());
    }
}
