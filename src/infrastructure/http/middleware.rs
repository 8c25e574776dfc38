//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use axum::{extract::Request, middleware::Next, response::Response};
use http::StatusCode;
use std::time::Instant;

use crate::infrastructure::adapters::CLIP_ROUTE_PREFIX;

/// HTTP 状态码错误日志中间件
///
/// 4xx/5xx 响应记录日志。业务错误（errno != 0）在 `ApiError::into_response()` 中记录。
/// 临时音频播放结束即被撤销，之后的 404 属于正常情况，只记 debug
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status == StatusCode::NOT_FOUND && uri.path().starts_with(CLIP_ROUTE_PREFIX) {
        tracing::debug!(uri = %uri, "Clip requested after release");
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    }

    response
}
