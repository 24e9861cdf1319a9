//! Web search client.
//!
//! One provider is selected at startup. Each provider module knows how to
//! build its request and how to map its payload onto [`SearchResult`];
//! [`SearchClient`] does the HTTP round trip and never lets a failure escape
//! [`SearchClient::search`].

use clap::ValueEnum;
use reqwest::Client;
use std::fmt;
use thiserror::Error;

use crate::config::SearchSettings;
use crate::data_models::{MAX_SOURCES, SearchResult};

pub mod bing;
pub mod duckduckgo;
pub mod serpapi;
pub mod tavily;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0} API key is not configured")]
    MissingApiKey(SearchProvider),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("API communication failure: {0}")]
    Http(reqwest::Error),

    #[error("search provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unable to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("search provider reported an error: {0}")]
    Provider(String),
}

// SerpAPI carries its key in the query string, so the URL never goes into
// error text.
impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Http(e.without_url())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    #[value(name = "tavily")]
    Tavily,
    #[value(name = "bing")]
    Bing,
    #[value(name = "serpapi")]
    SerpApi,
    #[value(name = "duckduckgo")]
    DuckDuckGo,
}

impl SearchProvider {
    pub fn name(&self) -> &'static str {
        match self {
            SearchProvider::Tavily => "tavily",
            SearchProvider::Bing => "bing",
            SearchProvider::SerpApi => "serpapi",
            SearchProvider::DuckDuckGo => "duckduckgo",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            SearchProvider::Tavily => "https://api.tavily.com",
            SearchProvider::Bing => "https://api.bing.microsoft.com",
            SearchProvider::SerpApi => "https://serpapi.com",
            SearchProvider::DuckDuckGo => "https://api.duckduckgo.com",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, SearchProvider::DuckDuckGo)
    }

    /// Map a raw response body onto normalized results, in provider order.
    pub fn parse(&self, body: &str) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            SearchProvider::Tavily => tavily::parse(body),
            SearchProvider::Bing => bing::parse(body),
            SearchProvider::SerpApi => serpapi::parse(body),
            SearchProvider::DuckDuckGo => duckduckgo::parse(body),
        }
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a search that degraded instead of failing.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
}

pub struct SearchClient {
    http: Client,
    settings: SearchSettings,
}

impl SearchClient {
    pub fn new(settings: SearchSettings) -> Result<SearchClient, SearchError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(SearchError::Client)?;
        Ok(SearchClient { http, settings })
    }

    pub fn provider(&self) -> SearchProvider {
        self.settings.provider
    }

    /// Runs the search, returning an empty result list plus the error text on
    /// any failure.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        match self.try_search(query).await {
            Ok(results) => SearchOutcome {
                results,
                error: None,
            },
            Err(e) => {
                tracing::warn!(provider = %self.provider(), "search failed, continuing without sources: {:#}", e);
                SearchOutcome {
                    results: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let provider = self.provider();
        let base_url = self.settings.base_url.trim_end_matches('/');
        let api_key = match (&self.settings.api_key, provider.requires_api_key()) {
            (Some(key), _) => key.as_str(),
            (None, false) => "",
            (None, true) => return Err(SearchError::MissingApiKey(provider)),
        };

        let request = match provider {
            SearchProvider::Tavily => tavily::request(&self.http, base_url, api_key, query),
            SearchProvider::Bing => bing::request(&self.http, base_url, api_key, query),
            SearchProvider::SerpApi => serpapi::request(&self.http, base_url, api_key, query),
            SearchProvider::DuckDuckGo => duckduckgo::request(&self.http, base_url, query),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%provider, status = status.as_u16(), bytes = body.len(), "search response received");

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let mut results = provider.parse(&body)?;
        results.truncate(MAX_SOURCES);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(provider: SearchProvider, api_key: Option<&str>) -> SearchSettings {
        SearchSettings {
            provider,
            api_key: api_key.map(str::to_string),
            // Nothing listens here; tests below must fail before sending.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_provider_names_are_stable() {
        assert_eq!(SearchProvider::Tavily.to_string(), "tavily");
        assert_eq!(SearchProvider::SerpApi.to_string(), "serpapi");
        assert_eq!(SearchProvider::DuckDuckGo.to_string(), "duckduckgo");
        assert_eq!(
            SearchProvider::from_str("serpapi", true),
            Ok(SearchProvider::SerpApi)
        );
    }

    #[test]
    fn test_only_duckduckgo_is_keyless() {
        assert!(SearchProvider::Tavily.requires_api_key());
        assert!(SearchProvider::Bing.requires_api_key());
        assert!(SearchProvider::SerpApi.requires_api_key());
        assert!(!SearchProvider::DuckDuckGo.requires_api_key());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = SearchClient::new(settings(SearchProvider::Bing, None)).unwrap();
        let err = client.try_search("rust").await.unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey(SearchProvider::Bing)));
        assert_eq!(err.to_string(), "bing API key is not configured");
    }

    #[tokio::test]
    async fn test_search_degrades_to_empty_outcome() {
        let client = SearchClient::new(settings(SearchProvider::Tavily, None)).unwrap();
        let outcome = client.search("rust").await;
        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.error.as_deref(),
            Some("tavily API key is not configured")
        );
    }
}
