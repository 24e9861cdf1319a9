pub mod answer_engine;
pub mod api;
pub mod completion;
pub mod config;
pub mod data_models;
pub mod prompt;
pub mod search;
