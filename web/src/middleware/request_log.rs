use axum::{extract::Request, middleware::Next, response::Response};
use log::*;
use tokio::time::Instant;

/// Access log line for every request. The query string is left out since the callback's
/// carries the authorization code.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
