use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data_models::SearchResult;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default, alias = "query")]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SearchResult>,
    /// Present only when an upstream call failed; maps each provider to its
    /// error message, or `null` if that provider succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Option<String>>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
