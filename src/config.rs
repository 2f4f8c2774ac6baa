use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;
use url::{ParseError, Url};

pub const BASE_URL_VAR: &str = "WIKIJS_BASE_URL";
pub const API_URL_VAR: &str = "WIKIJS_API_URL";
pub const API_TOKEN_VAR: &str = "WIKIJS_API_TOKEN";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),
    #[error("{var} is missing a protocol, must start with http:// or https://: {value}")]
    MissingScheme { var: &'static str, value: String },
    #[error("{var} has an invalid protocol, only http or https supported: {value}")]
    UnsupportedScheme { var: &'static str, value: String },
    #[error("{var} is not a valid URL: {value}")]
    MalformedUrl {
        var: &'static str,
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("BIND_ADDR is not a valid socket address: {value}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Clone)]
pub struct WikiConfig {
    /// Public site URL, kept verbatim so sitemap locations match what the operator configured.
    pub base_url: String,
    pub api_url: Url,
    pub api_token: String,
    pub bind_addr: SocketAddr,
}

impl fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiConfig")
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url.as_str())
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl WikiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, BASE_URL_VAR)?;
        let api_url = required(&lookup, API_URL_VAR)?;
        let api_token = required(&lookup, API_TOKEN_VAR)?;

        validate_http_url(BASE_URL_VAR, &base_url)?;
        let api_url = validate_http_url(API_URL_VAR, &api_url)?;

        let bind_value = lookup(BIND_ADDR_VAR)
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            api_url,
            api_token,
            bind_addr,
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(ConfigError::Missing(var)),
    }
}

// the url parser lowercases the scheme, so "HTTPS://" is accepted the same way "https://" is
fn validate_http_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| match source {
        ParseError::RelativeUrlWithoutBase => ConfigError::MissingScheme {
            var,
            value: value.to_string(),
        },
        source => ConfigError::MalformedUrl {
            var,
            value: value.to_string(),
            source,
        },
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme {
            var,
            value: value.to_string(),
        }),
    }
}
