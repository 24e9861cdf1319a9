use clap::Parser;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::completion::CompletionProvider;
use crate::search::SearchProvider;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingCompletionKey(&'static str),

    #[error("TEMPERATURE must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("{0} must be greater than 0")]
    ZeroTimeout(&'static str),
}

/// Raw settings, from flags or the environment (`.env` is loaded by `main`).
#[derive(Parser, Debug, Clone)]
#[command(name = "websage", version, about = "Answers questions with a language model grounded in live web search")]
pub struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "SEARCH_PROVIDER", value_enum, default_value_t = SearchProvider::Tavily)]
    pub search_provider: SearchProvider,

    #[arg(long, env = "SEARCH_BASE_URL")]
    pub search_base_url: Option<String>,

    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    pub tavily_api_key: Option<String>,

    #[arg(long, env = "BING_API_KEY", hide_env_values = true)]
    pub bing_api_key: Option<String>,

    #[arg(long, env = "SERP_API_KEY", hide_env_values = true)]
    pub serp_api_key: Option<String>,

    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value_t = 10)]
    pub search_timeout_secs: u64,

    #[arg(long, env = "COMPLETION_PROVIDER", value_enum)]
    pub completion_provider: Option<CompletionProvider>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "COMPLETION_MODEL")]
    pub completion_model: Option<String>,

    #[arg(long, env = "COMPLETION_BASE_URL")]
    pub completion_base_url: Option<String>,

    #[arg(long, env = "TEMPERATURE", default_value_t = 0.3)]
    pub temperature: f32,

    #[arg(long, env = "COMPLETION_TIMEOUT_SECS", default_value_t = 60)]
    pub completion_timeout_secs: u64,

    /// Optional system instruction sent ahead of every prompt.
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,
}

#[derive(Clone)]
pub struct SearchSettings {
    pub provider: SearchProvider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct CompletionSettings {
    pub provider: CompletionProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Resolved, validated configuration. Built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub search: SearchSettings,
    pub completion: CompletionSettings,
    pub system_prompt: Option<String>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Config, ConfigError> {
        if cli.search_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("SEARCH_TIMEOUT_SECS"));
        }
        if cli.completion_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("COMPLETION_TIMEOUT_SECS"));
        }
        if !(0.0..=2.0).contains(&cli.temperature) {
            return Err(ConfigError::InvalidTemperature(cli.temperature));
        }

        let openai_key = non_empty(cli.openai_api_key);
        let groq_key = non_empty(cli.groq_api_key);
        let completion_provider = match cli.completion_provider {
            Some(provider) => provider,
            None if openai_key.is_none() && groq_key.is_some() => CompletionProvider::Groq,
            None => CompletionProvider::OpenAi,
        };
        let completion_key = match completion_provider {
            CompletionProvider::OpenAi => openai_key,
            CompletionProvider::Groq => groq_key,
        }
        .ok_or(ConfigError::MissingCompletionKey(
            completion_provider.api_key_var(),
        ))?;

        let search_key = match cli.search_provider {
            SearchProvider::Tavily => non_empty(cli.tavily_api_key),
            SearchProvider::Bing => non_empty(cli.bing_api_key),
            SearchProvider::SerpApi => non_empty(cli.serp_api_key),
            SearchProvider::DuckDuckGo => None,
        };

        Ok(Config {
            host: cli.host,
            port: cli.port,
            search: SearchSettings {
                provider: cli.search_provider,
                api_key: search_key,
                base_url: non_empty(cli.search_base_url)
                    .unwrap_or_else(|| cli.search_provider.default_base_url().to_string()),
                timeout: Duration::from_secs(cli.search_timeout_secs),
            },
            completion: CompletionSettings {
                provider: completion_provider,
                api_key: completion_key,
                model: non_empty(cli.completion_model)
                    .unwrap_or_else(|| completion_provider.default_model().to_string()),
                base_url: non_empty(cli.completion_base_url)
                    .unwrap_or_else(|| completion_provider.default_base_url().to_string()),
                temperature: cli.temperature,
                timeout: Duration::from_secs(cli.completion_timeout_secs),
            },
            system_prompt: non_empty(cli.system_prompt),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// `KEY=` in a .env file counts as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for SearchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
