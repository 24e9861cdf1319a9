//! Tavily search API (`POST /search`).

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::SearchError;
use crate::data_models::{MAX_SOURCES, SearchResult};

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    snippet: Option<String>,
}

pub(crate) fn request(http: &Client, base_url: &str, api_key: &str, query: &str) -> RequestBuilder {
    http.post(format!("{}/search", base_url))
        .bearer_auth(api_key)
        .json(&json!({
            "query": query,
            "max_results": MAX_SOURCES,
        }))
}

pub fn parse(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: TavilyResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .map(|r| SearchResult::new(r.title, r.content.or(r.snippet), r.url))
        .collect())
}

#[test]
fn test_parse_tavily_results() {
    let body = r#"{
        "query": "capital of france",
        "results": [
            {"title": "Paris", "url": "https://en.wikipedia.org/wiki/Paris", "content": "capital city", "score": 0.98},
            {"title": "France", "url": "https://en.wikipedia.org/wiki/France", "content": null}
        ]
    }"#;
    let results = parse(body).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0],
        SearchResult {
            title: "Paris".into(),
            snippet: "capital city".into(),
            url: "https://en.wikipedia.org/wiki/Paris".into(),
        }
    );
    assert_eq!(results[1].snippet, "");
}

#[test]
fn test_parse_tavily_rejects_wrong_shape() {
    assert!(matches!(
        parse(r#"{"detail": "unauthorized"}"#),
        Err(SearchError::Parse(_))
    ));
    assert!(parse("<html>").is_err());
}
