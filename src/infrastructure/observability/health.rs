//! Health Report Endpoint
//!
//! 执行注册表并渲染报告，状态码反映总体健康状态：
//!
//! | 总体状态 | HTTP 状态码 |
//! |----------|-------------|
//! | ok       | 200         |
//! | warning  | 200（仅供参考）|
//! | critical | 503         |
//!
//! ## 响应格式
//! ```json
//! {
//!   "status": "critical",
//!   "checks": [
//!     { "name": "database", "status": "ok", "message": "Database connection is working" },
//!     { "name": "scheduler", "status": "critical", "message": "Stale heartbeat: ..." }
//!   ],
//!   "metrics": [
//!     { "name": "cpu_load", "value": 0.42 },
//!     { "name": "memory_usage", "value": 63.1, "unit": "%" }
//!   ],
//!   "generated_at": "2024-05-01T12:00:00Z"
//! }
//! ```

use crate::application::services::registry::HealthCheckRegistry;
use crate::domain::status::Status;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// 总体状态对应的 HTTP 状态码
pub fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Ok => StatusCode::OK,
        Status::Warning => StatusCode::OK,
        Status::Critical => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// 健康检查端点
pub async fn health_handler(State(registry): State<Arc<HealthCheckRegistry>>) -> Response {
    let report = registry.run().await;
    (status_code(report.status), Json(report)).into_response()
}
