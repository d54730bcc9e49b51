use axum::extract::{MatchedPath, Request};
use axum::{middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Record request count and latency per route template.
///
/// Labels use the matched route (`/movies/:title/summary`) rather than the
/// raw path so titles do not explode label cardinality.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    let labels = [("method", method), ("route", route), ("status", status)];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());

    response
}
