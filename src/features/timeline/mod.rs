use crate::AppState;
use crate::domain::{Page, publishable};
use crate::features::error::ApiError;
use axum::{Json, Router, extract::State, routing::get};
use tracing::info;

pub fn timeline_router() -> Router<AppState> {
    Router::new().route("/timeline", get(timeline_handler))
}

async fn timeline_handler(State(state): State<AppState>) -> Result<Json<Vec<Page>>, ApiError> {
    let pages = state.source.fetch_pages().await?;
    let upstream_count = pages.len();
    let timeline = render_timeline(pages);

    info!(
        "Serving timeline with {} of {} upstream pages",
        timeline.len(),
        upstream_count
    );

    Ok(Json(timeline))
}

/// The timeline is the publishable subset of the upstream list, untouched and in creation order.
pub fn render_timeline(pages: Vec<Page>) -> Vec<Page> {
    publishable(pages)
}
