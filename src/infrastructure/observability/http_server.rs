//! HTTP Observability Server
//!
//! 提供健康报告和Prometheus metrics端点
//!
//! ## 端点
//! - `GET /<prefix>/health` - 健康报告（`register_route = false` 时不注册）
//! - `GET /metrics` - Prometheus格式的指标
//!
//! 配置的中间件只作用于健康报告路由，按列表顺序由外向内执行。
//!
//! ## 使用示例
//! ```rust,ignore
//! let server = HealthServer::new(addr, registry, &config);
//! server.run(shutdown_signal()).await?;
//! ```

use super::health::health_handler;
use super::middleware::{require_token, trace_requests};
use crate::application::services::registry::HealthCheckRegistry;
use crate::shared::config::{HealthConfig, RouteMiddleware};
use crate::shared::metrics::METRICS;
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// 服务器错误
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// 构建路由
pub fn build_router(registry: Arc<HealthCheckRegistry>, config: &HealthConfig) -> Router {
    let mut router = Router::new().route("/metrics", get(metrics_handler));

    if config.register_route {
        let mut health = Router::new()
            .route(&config.health_path(), get(health_handler))
            .with_state(registry);

        // 后添加的 layer 在外层，逆序添加使列表第一个最先执行
        for middleware in config.middleware.iter().rev() {
            health = match middleware {
                RouteMiddleware::Trace => health.layer(from_fn(trace_requests)),
                RouteMiddleware::Token => {
                    let token: Arc<str> = Arc::from(config.api_token.as_deref().unwrap_or(""));
                    health.layer(from_fn_with_state(token, require_token))
                }
            };
        }
        router = router.merge(health);
    }

    router
}

/// 健康检查HTTP服务器
pub struct HealthServer {
    addr: SocketAddr,
    router: Router,
    health_path: Option<String>,
}

impl HealthServer {
    /// 创建新的服务器
    pub fn new(
        addr: SocketAddr,
        registry: Arc<HealthCheckRegistry>,
        config: &HealthConfig,
    ) -> Self {
        Self {
            addr,
            router: build_router(registry, config),
            health_path: config.register_route.then(|| config.health_path()),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// 启动HTTP服务器，`shutdown` 完成后优雅退出
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let local = listener.local_addr()?;

        info!("健康检查服务器启动于 {}", local);
        info!("Metrics端点: http://{}/metrics", local);
        if let Some(path) = &self.health_path {
            info!("健康检查端点: http://{}{}", local, path);
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("健康检查服务器已停止");
        Ok(())
    }
}

/// Prometheus metrics端点
async fn metrics_handler() -> Response {
    let metrics = METRICS.export();
    (StatusCode::OK, metrics).into_response()
}
