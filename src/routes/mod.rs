pub mod auth;
pub mod comments;
pub mod posts;
pub mod uploads;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application: API routes, with the public root served for everything else.
pub fn app(state: AppState) -> Router {
    let public = ServeDir::new(state.config.public_path());
    let body_limit = state.config.body_limit_bytes();

    Router::new()
        .merge(auth::router())
        .merge(uploads::router())
        .merge(posts::router())
        .merge(comments::router())
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
