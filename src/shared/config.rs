//! 健康检查配置
//!
//! 所有字段都有默认值，可以从 JSON 文件加载，再由命令行参数覆盖。
//!
//! ## 配置示例
//! ```json
//! {
//!   "route_prefix": "api",
//!   "middleware": ["trace", "token"],
//!   "api_token": "secret",
//!   "heartbeat": { "interval_secs": 60, "threshold_secs": 120 },
//!   "checks": { "environment": "production", "required_env": ["DATABASE_URL"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用在健康检查路由上的中间件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMiddleware {
    /// 记录请求日志
    Trace,
    /// 校验 API token
    Token,
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token middleware requires api_token to be set")]
    MissingToken,

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// 路由前缀，健康检查路径为 `/<prefix>/health`
    pub route_prefix: String,
    /// 健康检查路由的中间件（按顺序应用）
    pub middleware: Vec<RouteMiddleware>,
    /// token 中间件使用的密钥
    pub api_token: Option<String>,
    /// 是否注册健康检查路由
    pub register_route: bool,
    /// 是否注册心跳定时任务
    pub register_schedule: bool,
    /// 是否自动注册默认检查和指标
    pub register_defaults: bool,
    /// 单个探针的超时时间（毫秒）
    pub probe_timeout_ms: u64,
    pub heartbeat: HeartbeatConfig,
    pub checks: ChecksConfig,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            route_prefix: "api".to_string(),
            middleware: Vec::new(),
            api_token: None,
            register_route: true,
            register_schedule: true,
            register_defaults: true,
            probe_timeout_ms: 5_000,
            heartbeat: HeartbeatConfig::default(),
            checks: ChecksConfig::default(),
        }
    }
}

/// 心跳配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// 生产者触发间隔（秒）
    pub interval_secs: u64,
    /// 过期阈值（秒），默认两倍间隔
    pub threshold_secs: u64,
    /// 文件心跳存储目录（多个进程共享）
    pub store_dir: PathBuf,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            threshold_secs: 120,
            store_dir: PathBuf::from("storage/heartbeats"),
        }
    }
}

impl HeartbeatConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_secs)
    }
}

/// 内置检查的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// 运行环境名称
    pub environment: String,
    /// 是否开启调试模式
    pub debug: bool,
    /// 必须存在的环境变量
    pub required_env: Vec<String>,
    /// 存储可写性检查的目录
    pub storage_dir: PathBuf,
    /// 磁盘检查的路径
    pub disk_path: PathBuf,
    pub disk_warning_percent: f64,
    pub disk_critical_percent: f64,
    pub keystore_warning_percent: f64,
    pub keystore_critical_percent: f64,
    /// 日志文件路径
    pub log_file: PathBuf,
    pub queue_backlog_warning: u64,
    pub queue_backlog_critical: u64,
    /// 没有进程内任务队列时也注册队列存活检查（由外部工作进程写入心跳）
    pub queue_liveness: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            debug: false,
            required_env: Vec::new(),
            storage_dir: PathBuf::from("storage"),
            disk_path: PathBuf::from("/"),
            disk_warning_percent: 80.0,
            disk_critical_percent: 90.0,
            keystore_warning_percent: 80.0,
            keystore_critical_percent: 90.0,
            log_file: PathBuf::from("storage/logs/app.log"),
            queue_backlog_warning: 100,
            queue_backlog_critical: 1_000,
            queue_liveness: false,
        }
    }
}

impl HealthConfig {
    /// 从 JSON 文件加载配置，缺失字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: HealthConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.middleware.contains(&RouteMiddleware::Token)
            && self.api_token.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::MissingToken);
        }
        if self.heartbeat.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "heartbeat.interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.heartbeat.threshold_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "heartbeat.threshold_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "probe_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.checks.disk_warning_percent > self.checks.disk_critical_percent {
            return Err(ConfigError::Invalid {
                field: "checks.disk_warning_percent",
                reason: "must not exceed disk_critical_percent".to_string(),
            });
        }
        if self.checks.keystore_warning_percent > self.checks.keystore_critical_percent {
            return Err(ConfigError::Invalid {
                field: "checks.keystore_warning_percent",
                reason: "must not exceed keystore_critical_percent".to_string(),
            });
        }
        if self.checks.queue_backlog_warning > self.checks.queue_backlog_critical {
            return Err(ConfigError::Invalid {
                field: "checks.queue_backlog_warning",
                reason: "must not exceed queue_backlog_critical".to_string(),
            });
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// 健康检查路由的完整路径
    pub fn health_path(&self) -> String {
        let prefix = self.route_prefix.trim_matches('/');
        if prefix.is_empty() {
            "/health".to_string()
        } else {
            format!("/{}/health", prefix)
        }
    }
}
