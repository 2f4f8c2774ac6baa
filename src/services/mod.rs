use crate::domain::Page;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub mod graphql;

pub use self::graphql::GraphQlPageSource;

/// Every way a page fetch can fail. Handlers must map each variant to a response explicitly.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The upstream rejected the bearer token (HTTP 401).
    #[error("Authentication failed: WIKIJS_API_TOKEN is invalid")]
    Authentication,
    /// Any other non-success status from the upstream.
    #[error("GraphQL request failed: upstream returned {status}")]
    UpstreamRequest { status: StatusCode, detail: String },
    /// The API URL could not be used to build a request.
    #[error("WIKIJS_API_URL format error")]
    Configuration,
    /// Transport failures and responses that do not match the expected shape.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// the routes only ever need the current list of pages, so this is the whole seam
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_pages(&self) -> Result<Vec<Page>, FetchError>;
}
