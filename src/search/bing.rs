//! Bing Web Search API v7.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::SearchError;
use crate::data_models::{MAX_SOURCES, SearchResult};

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages")]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Debug, Deserialize)]
struct BingWebPage {
    name: Option<String>,
    url: Option<String>,
    snippet: Option<String>,
}

pub(crate) fn request(http: &Client, base_url: &str, api_key: &str, query: &str) -> RequestBuilder {
    let count = MAX_SOURCES.to_string();
    http.get(format!("{}/v7.0/search", base_url))
        .query(&[("q", query), ("count", count.as_str())])
        .header("Ocp-Apim-Subscription-Key", api_key)
}

pub fn parse(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: BingResponse = serde_json::from_str(body)?;
    // Bing leaves out `webPages` entirely when nothing matched.
    let pages = response.web_pages.map(|p| p.value).unwrap_or_default();
    Ok(pages
        .into_iter()
        .map(|p| SearchResult::new(p.name, p.snippet, p.url))
        .collect())
}

#[test]
fn test_parse_bing_web_pages() {
    let body = r#"{
        "_type": "SearchResponse",
        "webPages": {
            "totalEstimatedMatches": 2,
            "value": [
                {"name": "Rust", "url": "https://www.rust-lang.org/", "snippet": "A language empowering everyone"},
                {"name": "The Book", "url": "https://doc.rust-lang.org/book/"}
            ]
        }
    }"#;
    let results = parse(body).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Rust");
    assert_eq!(results[0].snippet, "A language empowering everyone");
    assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
    assert_eq!(results[1].snippet, "");
}

#[test]
fn test_parse_bing_without_web_pages() {
    let results = parse(r#"{"_type": "SearchResponse"}"#).unwrap();
    assert!(results.is_empty());
}
