/// 健康检查路由中间件
///
/// - `trace_requests`: 记录请求方法、路径、状态码和耗时
/// - `require_token`: 校验 `Authorization: Bearer <token>`、`X-Api-Token`
///   请求头或 `token` 查询参数（按 URL 编码解码）

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 请求日志
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

/// token 校验
pub async fn require_token(
    State(expected): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = matches!(
        presented_token(&request),
        Some(token) if !expected.is_empty() && token == *expected
    );
    if !authorized {
        warn!("健康检查请求 token 校验失败: {}", request.uri().path());
        return (StatusCode::UNAUTHORIZED, "invalid or missing token").into_response();
    }
    next.run(request).await
}

fn presented_token(request: &Request) -> Option<String> {
    let headers = request.headers();
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim().to_string());
    }
    if let Some(token) = headers.get("x-api-token").and_then(|v| v.to_str().ok()) {
        return Some(token.trim().to_string());
    }
    Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove("token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str, header: Option<(&str, &str)>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let req = request("/api/health", Some(("authorization", "Bearer secret")));
        assert_eq!(presented_token(&req).as_deref(), Some("secret"));
    }

    #[test]
    fn test_header_token() {
        let req = request("/api/health", Some(("x-api-token", "secret")));
        assert_eq!(presented_token(&req).as_deref(), Some("secret"));
    }

    #[test]
    fn test_query_token() {
        let req = request("/api/health?verbose=1&token=secret", None);
        assert_eq!(presented_token(&req).as_deref(), Some("secret"));
    }

    #[test]
    fn test_query_token_is_percent_decoded() {
        let req = request("/api/health?token=p%40ss%20word", None);
        assert_eq!(presented_token(&req).as_deref(), Some("p@ss word"));

        let req = request("/api/health?token=a%26b%3Dc", None);
        assert_eq!(presented_token(&req).as_deref(), Some("a&b=c"));
    }

    #[test]
    fn test_no_token() {
        let req = request("/api/health?verbose=1", None);
        assert_eq!(presented_token(&req), None);
    }
}
