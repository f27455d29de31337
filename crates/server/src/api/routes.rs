use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::{auth_middleware, metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes that require the bot host's access token
    let protected = Router::new()
        .route("/onebot/event", post(handlers::post_event))
        .route("/api/v1/config", get(handlers::get_config))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
