//! SerpAPI, Google engine (`GET /search.json`).

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::SearchError;
use crate::data_models::{MAX_SOURCES, SearchResult};

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SerpResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

pub(crate) fn request(http: &Client, base_url: &str, api_key: &str, query: &str) -> RequestBuilder {
    let num = MAX_SOURCES.to_string();
    http.get(format!("{}/search.json", base_url)).query(&[
        ("engine", "google"),
        ("q", query),
        ("num", num.as_str()),
        ("api_key", api_key),
    ])
}

pub fn parse(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: SerpResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        if response.organic_results.is_empty() {
            return Err(SearchError::Provider(error));
        }
    }
    Ok(response
        .organic_results
        .into_iter()
        .map(|r| SearchResult::new(r.title, r.snippet, r.link))
        .collect())
}

#[test]
fn test_parse_serpapi_organic_results() {
    let body = r#"{
        "search_metadata": {"status": "Success"},
        "organic_results": [
            {"position": 1, "title": "Tokio", "link": "https://tokio.rs/", "snippet": "An asynchronous runtime", "source": "tokio.rs"}
        ]
    }"#;
    let results = parse(body).unwrap();
    assert_eq!(
        results,
        vec![SearchResult {
            title: "Tokio".into(),
            snippet: "An asynchronous runtime".into(),
            url: "https://tokio.rs/".into(),
        }]
    );
}

#[test]
fn test_parse_serpapi_error_payload() {
    let err = parse(r#"{"error": "Invalid API key."}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "search provider reported an error: Invalid API key."
    );
}

#[test]
fn test_parse_serpapi_no_results_is_empty() {
    let results = parse(r#"{"search_metadata": {"status": "Success"}}"#).unwrap();
    assert!(results.is_empty());
}
