//! NewsAPI (`newsapi.org/v2`) source implementation.
//!
//! Fetches `top-headlines` and `everything` pages over HTTP with
//! [`reqwest`] and maps failures onto [`FetchError`]:
//!
//! * connect / timeout / request-building failures → `Transport`
//! * non-success HTTP status → `Server`, carrying the body's `message` when
//!   the API sent one and the HTTP reason phrase otherwise
//! * undecodable bodies → `Other`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{NewsResponse, NewsSource};
use crate::config::Config;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("livescroll-news/", env!("CARGO_PKG_VERSION"));

/// A NewsAPI client.
#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

/// Body NewsAPI sends alongside a failing status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl NewsApiClient {
    /// Build a client from the configured endpoint, key and page size.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_page(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<NewsResponse, FetchError> {
        let mut request = self.client.get(self.endpoint(path)).query(params);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                message: server_message(status, &body),
            });
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Self::parse_page(&bytes)
    }

    /// Decode a page body.
    ///
    /// Pure (no I/O) so that tests can exercise it without the network.
    pub fn parse_page(body: &[u8]) -> Result<NewsResponse, FetchError> {
        let page: NewsResponse =
            serde_json::from_slice(body).map_err(|e| FetchError::Other(e.to_string()))?;

        if page.status == "error" {
            let message = serde_json::from_slice::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "error".to_string());
            return Err(FetchError::Server {
                status: StatusCode::OK.as_u16(),
                message,
            });
        }

        Ok(page)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn headlines(&self, country: &str, page: u32) -> Result<NewsResponse, FetchError> {
        tracing::debug!(country, page, "fetching headlines");
        self.get_page(
            "top-headlines",
            &[
                ("country", country.to_string()),
                ("page", page.to_string()),
                ("pageSize", self.page_size.to_string()),
            ],
        )
        .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<NewsResponse, FetchError> {
        tracing::debug!(query, page, "searching");
        self.get_page(
            "everything",
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("pageSize", self.page_size.to_string()),
            ],
        )
        .await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        FetchError::Transport(err.to_string())
    } else {
        FetchError::Other(err.to_string())
    }
}

/// Message to publish for a failing status: the API's own text when present.
fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(String::from))
        .unwrap_or_else(|| status.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
