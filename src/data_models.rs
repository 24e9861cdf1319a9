use serde::{Deserialize, Serialize};

/// Upper bound on the number of web results forwarded to the model.
pub const MAX_SOURCES: usize = 5;

/// One normalized web result, whatever provider produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(
        title: Option<String>,
        snippet: Option<String>,
        url: Option<String>,
    ) -> SearchResult {
        SearchResult {
            title: title.unwrap_or_default(),
            snippet: snippet.unwrap_or_default(),
            url: url.unwrap_or_default(),
        }
    }
}

#[test]
fn test_search_result_defaults_missing_fields() {
    let result = SearchResult::new(Some("Paris".into()), None, None);
    assert_eq!(result.title, "Paris");
    assert_eq!(result.snippet, "");
    assert_eq!(result.url, "");
}
