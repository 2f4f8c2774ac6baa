pub mod render;

use crate::AppState;
use crate::features::error::ApiError;
use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use render::render_sitemap;
use tracing::info;

pub fn sitemap_router() -> Router<AppState> {
    Router::new().route("/sitemap", get(sitemap_handler))
}

async fn sitemap_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pages = state.source.fetch_pages().await?;
    let xml = render_sitemap(&state.config.base_url, &pages)?;

    info!("Rendered sitemap from {} upstream pages", pages.len());

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}
