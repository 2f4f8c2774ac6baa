use crate::features::sitemap::render::RenderError;
use crate::services::FetchError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to render sitemap: {0}")]
    Render(#[from] RenderError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Fetch(FetchError::Authentication) => StatusCode::UNAUTHORIZED,
            ApiError::Fetch(FetchError::UpstreamRequest { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Fetch(FetchError::Configuration | FetchError::Internal(_))
            | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(%status, "{}", detail);
        } else {
            warn!(%status, "{}", detail);
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
