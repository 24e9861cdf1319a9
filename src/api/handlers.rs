use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::answer_engine::{Answer, AnswerEngine};
use crate::completion::CompletionProvider;
use crate::search::SearchProvider;

use super::error::ApiError;
use super::models::{ChatRequest, ChatResponse, HealthResponse};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "websage",
    })
}

pub async fn chat_handler(
    State(engine): State<Arc<AnswerEngine>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::Validation)?
        .to_string();

    let span = tracing::info_span!("chat", request_id = %nanoid::nanoid!(10));
    async move {
        let start = Instant::now();
        tracing::info!(bytes = question.len(), "answering question");

        let answer = engine.answer(&question).await;
        let response = shape_response(
            answer,
            engine.search_provider(),
            engine.completion_provider(),
        );

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            degraded = response.errors.is_some(),
            "request finished"
        );
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}

/// A failed completion still yields readable `answer` text, but `errors`
/// is what callers should branch on.
pub fn shape_response(
    answer: Answer,
    search_provider: SearchProvider,
    completion_provider: CompletionProvider,
) -> ChatResponse {
    let (text, completion_error) = match answer.completion {
        Ok(text) => (text, None),
        Err(e) => (format!("Error: {}", e), Some(e.to_string())),
    };

    let errors = if answer.search_error.is_some() || completion_error.is_some() {
        Some(BTreeMap::from([
            (search_provider.to_string(), answer.search_error),
            (completion_provider.to_string(), completion_error),
        ]))
    } else {
        None
    };

    ChatResponse {
        answer: text,
        sources: answer.sources,
        errors,
    }
}
