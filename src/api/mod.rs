use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::answer_engine::AnswerEngine;

pub mod error;
pub mod handlers;
pub mod models;

pub fn create_router(engine: Arc<AnswerEngine>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health_handler))
        .route("/api/chat", post(handlers::chat_handler))
        .with_state(engine)
        .layer(cors)
}
