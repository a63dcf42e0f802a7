//! 应用健康检查与心跳存活服务
//!
//! 分层结构：
//! - `domain`: 状态、检查契约、心跳记录与任务
//! - `application`: 注册表、心跳生产者、默认注册
//! - `infrastructure`: 内置检查与指标、心跳存储、任务队列、HTTP接口
//! - `interfaces`: 命令行
//! - `shared`: 配置、时钟、Prometheus 指标

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
