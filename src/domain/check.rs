/// 检查与指标的核心trait定义

use super::heartbeat::StoreError;
use super::status::{CheckResult, MetricReading};
use async_trait::async_trait;
use std::time::Duration;

/// 注册时声明的能力标志
///
/// 注册表只通过能力标志识别特定检查，不做具体类型判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 队列工作进程存活检查（启用队列心跳生产者）
    QueueLiveness,
}

/// 探针执行错误
///
/// 这些错误永远不会越过注册表边界，由注册表转换为 `critical` 结果。
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Dependency unreachable: {0}")]
    Unreachable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Heartbeat store error: {0}")]
    Store(#[from] StoreError),

    #[error("Probe panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl CheckError {
    /// Prometheus 标签使用的原因分类
    pub fn reason(&self) -> &'static str {
        match self {
            CheckError::Unreachable(_) => "unreachable",
            CheckError::Io(_) => "io",
            CheckError::Timeout(_) => "timeout",
            CheckError::Store(_) => "store",
            CheckError::Panicked(_) => "panic",
            CheckError::Failed(_) => "failed",
        }
    }
}

/// 健康检查
///
/// 一个有名称的探针，运行后产生一个 `CheckResult`。
/// 实现可以直接返回错误，注册表负责将其转换为 `critical` 结果。
#[async_trait]
pub trait Check: Send + Sync {
    /// 检查名称（报告中的展示名）
    fn name(&self) -> &str;

    /// 执行检查
    async fn run(&self) -> Result<CheckResult, CheckError>;

    /// 注册时读取的能力标志
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }
}

/// 指标
///
/// 只做观测，不做判断。失败时注册表生成带错误标记的读数。
#[async_trait]
pub trait Metric: Send + Sync {
    /// 指标名称
    fn name(&self) -> &str;

    /// 采集读数
    async fn value(&self) -> Result<MetricReading, CheckError>;
}
