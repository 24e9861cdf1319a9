use anyhow::Result;

use crate::completion::{CompletionClient, CompletionError, CompletionProvider};
use crate::config::Config;
use crate::data_models::SearchResult;
use crate::prompt;
use crate::search::{SearchClient, SearchProvider};

/// What one pass through the pipeline produced. Shaping it for the wire is
/// left to the caller.
#[derive(Debug)]
pub struct Answer {
    pub completion: Result<String, CompletionError>,
    pub sources: Vec<SearchResult>,
    pub search_error: Option<String>,
}

pub struct AnswerEngine {
    search: SearchClient,
    completion: CompletionClient,
    system_prompt: Option<String>,
}

impl AnswerEngine {
    pub fn new(
        search: SearchClient,
        completion: CompletionClient,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            search,
            completion,
            system_prompt,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let search = SearchClient::new(config.search.clone())?;
        let completion = CompletionClient::new(config.completion.clone())?;
        Ok(Self::new(search, completion, config.system_prompt.clone()))
    }

    pub fn search_provider(&self) -> SearchProvider {
        self.search.provider()
    }

    pub fn completion_provider(&self) -> CompletionProvider {
        self.completion.provider()
    }

    /// Search, assemble, complete. Sequential, one call each, and upstream
    /// failures end up inside the returned [`Answer`].
    pub async fn answer(&self, question: &str) -> Answer {
        let outcome = self.search.search(question).await;
        tracing::info!(
            provider = %self.search_provider(),
            sources = outcome.results.len(),
            "search finished"
        );

        let prompt = prompt::assemble(question, &outcome.results);
        let completion = self
            .completion
            .complete(&prompt, self.system_prompt.as_deref())
            .await;
        match &completion {
            Ok(text) => tracing::info!(bytes = text.len(), "completion finished"),
            Err(e) => tracing::warn!(
                provider = %self.completion_provider(),
                "completion failed: {:#}",
                e
            ),
        }

        Answer {
            completion,
            sources: outcome.results,
            search_error: outcome.error,
        }
    }
}
