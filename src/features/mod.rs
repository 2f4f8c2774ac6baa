pub mod error;
pub mod sitemap;
pub mod timeline;

use crate::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

// where features are composed
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(sitemap::sitemap_router())
        .merge(timeline::timeline_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
