mod form;
mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::{application::highlight::HighlightService, infra::platform::PlatformEnv};

pub use form::HighlightForm;

#[derive(Clone)]
pub struct HttpState {
    pub highlighter: Arc<HighlightService>,
    /// Validated at startup; handlers never read it.
    pub platform: Arc<PlatformEnv>,
}

/// Routes: `POST /` highlights a snippet, `GET /discover` describes the service.
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::highlight).layer(DefaultBodyLimit::disable()),
        )
        .route("/discover", get(handlers::discover))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
