//! HTTP client for the CVR registry search endpoint.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{CompanyQuery, Query},
    types::SearchResponse,
    Error,
};

/// Production search endpoint of the CVR distribution index.
pub const DEFAULT_SEARCH_URL: &str = "http://distribution.virk.dk/cvr-permanent/virksomhed/_search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials for the distribution endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client for the CVR registry `_search` endpoint.
///
/// Every call POSTs an Elasticsearch query body and decodes the hit envelope.
/// Credentials, when present, are sent as HTTP basic auth.
pub struct Client {
    /// Full `_search` URL. Defaults to [`DEFAULT_SEARCH_URL`].
    search_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production CVR search endpoint.
    pub fn new() -> Self {
        Self::with_search_url(DEFAULT_SEARCH_URL)
    }

    /// Creates a new client with a custom search URL. Used for testing with wiremock.
    pub fn with_search_url(search_url: &str) -> Self {
        Self {
            search_url: search_url.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attaches basic-auth credentials to every request.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Overrides the per-request timeout (default 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn get_url(&self) -> Result<Url, Error> {
        Url::parse(&self.search_url).map_err(|e| {
            tracing::error!("Invalid search URL {}: {}", self.search_url, e);
            Error::RequestFailed
        })
    }

    async fn post<T, Q>(&self, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url()?;
        let body = query.to_body();
        tracing::debug!("POST {} {}", url, body);

        let client = reqwest::Client::builder()
            .user_agent(concat!("cvr-enrichment/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let mut request = client
            .post(url)
            .header("accept", "application/json")
            .json(&body);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to query registry: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Registry query failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse search response: {} | body: {}", e, snippet);
            Error::ParseFailed(e.to_string())
        })
    }

    /// Runs a company search and returns the raw hit envelope.
    pub async fn search(&self, query: &CompanyQuery) -> Result<SearchResponse, Error> {
        self.post::<SearchResponse, CompanyQuery>(query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
