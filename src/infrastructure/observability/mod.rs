//! Observability Module
//!
//! 健康报告的HTTP接口：
//! - 健康报告端点（状态码映射）
//! - 路由中间件（请求日志、token 校验）
//! - Prometheus metrics导出
//!
//! ## 模块结构
//! - `health` - 健康报告端点
//! - `middleware` - 路由中间件
//! - `http_server` - 路由构建与HTTP服务器

pub mod health;
pub mod http_server;
pub mod middleware;

pub use health::{health_handler, status_code};
pub use http_server::{build_router, HealthServer, ServerError};
