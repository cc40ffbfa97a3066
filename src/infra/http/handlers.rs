use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::{Span, info};

use crate::{application::error::HttpError, domain::descriptor::ServiceDescriptor};

use super::{HttpState, form::HighlightForm};

const SOURCE: &str = "infra::http::handlers";

/// Rendering is CPU-bound and unbounded in input size, so it runs on the
/// blocking pool inside the caller's request span.
pub(super) async fn highlight(
    State(state): State<HttpState>,
    HighlightForm(request): HighlightForm,
) -> Result<String, HttpError> {
    let highlighter = Arc::clone(&state.highlighter);
    let span = Span::current();
    let highlighted =
        tokio::task::spawn_blocking(move || span.in_scope(|| highlighter.highlight(&request)))
            .await
            .map_err(|err| {
                HttpError::from_error(
                    SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    &err,
                )
            })??;
    Ok(highlighted.markup)
}

pub(super) async fn discover() -> Json<ServiceDescriptor> {
    info!(target = "pygments_service::discover", "got a discovery request");
    Json(ServiceDescriptor::pygments())
}
