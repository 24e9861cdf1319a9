//! DuckDuckGo Instant Answer API. Keyless, but sparse: the abstract (when
//! there is one) plus related topics.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::SearchError;
use crate::data_models::SearchResult;

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading")]
    heading: Option<String>,
    #[serde(rename = "AbstractText")]
    abstract_text: Option<String>,
    #[serde(rename = "AbstractURL")]
    abstract_url: Option<String>,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<Topic>,
    },
    Entry(Topic),
}

#[derive(Debug, Deserialize)]
struct Topic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
}

impl Topic {
    fn into_result(self) -> Option<SearchResult> {
        let text = self.text.filter(|t| !t.is_empty())?;
        let title = text.split(" - ").next().unwrap_or_default().to_string();
        Some(SearchResult::new(Some(title), Some(text), self.first_url))
    }
}

pub(crate) fn request(http: &Client, base_url: &str, query: &str) -> RequestBuilder {
    http.get(format!("{}/", base_url)).query(&[
        ("q", query),
        ("format", "json"),
        ("no_html", "1"),
        ("skip_disambig", "1"),
    ])
}

pub fn parse(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let answer: InstantAnswer = serde_json::from_str(body)?;
    let mut results = Vec::new();

    if let Some(abstract_text) = answer.abstract_text.filter(|t| !t.is_empty()) {
        results.push(SearchResult::new(
            answer.heading,
            Some(abstract_text),
            answer.abstract_url,
        ));
    }

    for topic in answer.related_topics {
        match topic {
            RelatedTopic::Group { topics } => {
                results.extend(topics.into_iter().filter_map(Topic::into_result))
            }
            RelatedTopic::Entry(topic) => results.extend(topic.into_result()),
        }
    }
    Ok(results)
}

#[test]
fn test_parse_abstract_then_topics() {
    let body = r#"{
        "Heading": "Paris",
        "AbstractText": "Paris is the capital and largest city of France.",
        "AbstractURL": "https://en.wikipedia.org/wiki/Paris",
        "RelatedTopics": [
            {"Text": "Paris Metro - Rapid transit system", "FirstURL": "https://duckduckgo.com/Paris_Metro"},
            {"Name": "Places", "Topics": [
                {"Text": "Louvre - Art museum", "FirstURL": "https://duckduckgo.com/Louvre"},
                {"Text": "", "FirstURL": "https://duckduckgo.com/Empty"}
            ]}
        ]
    }"#;
    let results = parse(body).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Paris");
    assert_eq!(results[0].url, "https://en.wikipedia.org/wiki/Paris");
    assert_eq!(results[1].title, "Paris Metro");
    assert_eq!(results[1].snippet, "Paris Metro - Rapid transit system");
    assert_eq!(results[2].title, "Louvre");
}

#[test]
fn test_parse_empty_instant_answer() {
    let body = r#"{"Heading": "", "AbstractText": "", "RelatedTopics": []}"#;
    assert!(parse(body).unwrap().is_empty());
}
