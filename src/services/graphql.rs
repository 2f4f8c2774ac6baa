use crate::config::WikiConfig;
use crate::domain::Page;
use crate::services::{FetchError, PageSource};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

pub const PAGES_QUERY: &str = r#"
{
  pages {
    list (orderBy: CREATED) {
      id
      path
      locale
      title
      description
      isPublished
      isPrivate
      createdAt
      updatedAt
      tags
    }
  }
}
"#;

// upstream error bodies can be whole HTML pages; keep only enough for a log line
const MAX_DETAIL_CHARS: usize = 512;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PagesData {
    pages: PagesList,
}

#[derive(Deserialize)]
struct PagesList {
    list: Vec<Page>,
}

/// Fetches the page list from the Wiki.js GraphQL endpoint. One POST per call, no caching.
#[derive(Clone)]
pub struct GraphQlPageSource {
    client: Client,
    api_url: Url,
    token: String,
}

impl fmt::Debug for GraphQlPageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlPageSource")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GraphQlPageSource {
    /// Client settings shared by every source. Redirects are not followed, so a 3xx from the
    /// wiki is reported like any other non-2xx answer instead of being replayed as a GET.
    pub fn client_builder() -> ClientBuilder {
        Client::builder()
            .user_agent(concat!("wikijs-sitemap/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
    }

    pub fn new(api_url: Url, token: String) -> reqwest::Result<Self> {
        let client = Self::client_builder().build()?;
        Ok(Self::with_client(client, api_url, token))
    }

    pub fn with_client(client: Client, api_url: Url, token: String) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }

    pub fn from_config(config: &WikiConfig) -> reqwest::Result<Self> {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }
}

#[async_trait]
impl PageSource for GraphQlPageSource {
    async fn fetch_pages(&self) -> Result<Vec<Page>, FetchError> {
        // the config loader already checks this, but the constructors accept any url
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(FetchError::Configuration);
        }

        debug!("Querying page list from {}", self.api_url);

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.token)
            .json(&GraphQlRequest { query: PAGES_QUERY })
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    FetchError::Configuration
                } else {
                    FetchError::Internal(e.to_string())
                }
            })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Authentication);
        }

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Could not read error body from GraphQL endpoint: {}", e);
                    String::new()
                }
            };
            let detail: String = body.chars().take(MAX_DETAIL_CHARS).collect();
            warn!("GraphQL endpoint answered {}: {}", status, detail);
            return Err(FetchError::UpstreamRequest { status, detail });
        }

        let envelope: GraphQlResponse<PagesData> = response
            .json()
            .await
            .map_err(|e| FetchError::Internal(format!("malformed GraphQL response: {e}")))?;

        match envelope.data {
            Some(data) => {
                if !envelope.errors.is_empty() {
                    warn!(
                        "GraphQL response carried {} error(s) alongside data",
                        envelope.errors.len()
                    );
                }
                debug!("Fetched {} pages", data.pages.list.len());
                Ok(data.pages.list)
            }
            None if envelope.errors.is_empty() => Err(FetchError::Internal(
                "GraphQL response has no data".to_string(),
            )),
            None => {
                let messages: Vec<&str> =
                    envelope.errors.iter().map(|e| e.message.as_str()).collect();
                Err(FetchError::Internal(format!(
                    "GraphQL errors: {}",
                    messages.join("; ")
                )))
            }
        }
    }
}
