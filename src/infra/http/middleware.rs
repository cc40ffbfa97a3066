use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

const SOURCE: &str = "pygments_service::http::response";

/// Run the request inside a `request` span carrying a fresh id, so every event
/// logged while serving it (including the highlight diagnostics) can be
/// correlated.
pub async fn set_request_context(request: Request<Body>, next: Next) -> Response {
    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    next.run(request).instrument(span).await
}

/// Log failed responses with the diagnostic report attached by the handler.
/// Method, path and request id come from the enclosing `request` span.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        // Rejections produced by axum itself (405, 404) carry no report.
        None => ("axum", Vec::new()),
    };
    let detail = messages
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = SOURCE,
            status = status.as_u16(),
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            "highlight request failed",
        );
    } else {
        warn!(
            target = SOURCE,
            status = status.as_u16(),
            elapsed_ms,
            source,
            detail,
            "request rejected",
        );
    }

    response
}
