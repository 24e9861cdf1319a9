//! Chat-completion client for OpenAI-compatible endpoints (OpenAI, Groq).

use clap::ValueEnum;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::CompletionSettings;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("API communication failure: {0}")]
    Http(reqwest::Error),

    #[error("completion provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("completion provider reported an error: {0}")]
    Api(String),

    #[error("unable to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion response contained no text")]
    EmptyCompletion,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        CompletionError::Http(e.without_url())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionProvider {
    #[value(name = "openai")]
    OpenAi,
    #[value(name = "groq")]
    Groq,
}

impl CompletionProvider {
    pub fn name(&self) -> &'static str {
        match self {
            CompletionProvider::OpenAi => "openai",
            CompletionProvider::Groq => "groq",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            CompletionProvider::OpenAi => "OPENAI_API_KEY",
            CompletionProvider::Groq => "GROQ_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            CompletionProvider::OpenAi => "gpt-4o-mini",
            CompletionProvider::Groq => "llama-3.3-70b-versatile",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            CompletionProvider::OpenAi => "https://api.openai.com/v1",
            CompletionProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }
}

impl fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

pub struct CompletionClient {
    http: Client,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(settings: CompletionSettings) -> Result<CompletionClient, CompletionError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(CompletionError::Client)?;
        Ok(CompletionClient { http, settings })
    }

    pub fn provider(&self) -> CompletionProvider {
        self.settings.provider
    }

    pub fn build_request<'a>(
        &'a self,
        prompt: &'a str,
        system_instruction: Option<&'a str>,
    ) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_instruction {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
        }
    }

    /// Sends one chat completion request and returns the first choice's text.
    pub async fn complete(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, CompletionError> {
        let endpoint = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let body = self.build_request(prompt, system_instruction);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(provider = %self.provider(), status = status.as_u16(), bytes = text.len(), "completion response received");

        parse_completion(status.as_u16(), &text)
    }
}

fn parse_completion(status: u16, body: &str) -> Result<String, CompletionError> {
    let parsed = serde_json::from_str::<ChatCompletionResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(CompletionError::Status { status, message });
    }

    let response = parsed?;
    if let Some(message) = response.error.and_then(|e| e.message) {
        return Err(CompletionError::Api(message));
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(CompletionError::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> CompletionClient {
        CompletionClient::new(CompletionSettings {
            provider: CompletionProvider::OpenAi,
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: 0.3,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_request_without_system_instruction() {
        let client = client();
        let request = client.build_request("hello", None);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(
            request.messages,
            vec![ChatMessage {
                role: "user",
                content: "hello"
            }]
        );
    }

    #[test]
    fn test_system_instruction_goes_first() {
        let client = client();
        let request = client.build_request("hello", Some("You are Sage."));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are Sage.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Paris."}}]}"#;
        assert_eq!(parse_completion(200, body).unwrap(), "Paris.");
    }

    #[test]
    fn test_parse_missing_content() {
        assert!(matches!(
            parse_completion(200, r#"{"choices": []}"#),
            Err(CompletionError::EmptyCompletion)
        ));
        assert!(matches!(
            parse_completion(200, r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(CompletionError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_parse_error_status_uses_api_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let err = parse_completion(401, body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "completion provider returned HTTP 401: Incorrect API key provided"
        );
    }

    #[test]
    fn test_parse_error_status_with_plain_body() {
        let err = parse_completion(502, "Bad Gateway").unwrap_err();
        assert!(matches!(err, CompletionError::Status { status: 502, .. }));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_parse_error_payload_with_ok_status() {
        let err = parse_completion(200, r#"{"error": {"message": "model overloaded"}}"#).unwrap_err();
        assert!(matches!(err, CompletionError::Api(ref m) if m == "model overloaded"));
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            parse_completion(200, "not json"),
            Err(CompletionError::Parse(_))
        ));
    }
}
