use crate::data_models::SearchResult;

pub const NO_RESULTS: &str = "No web results were found for this question.";

pub const ANSWER_INSTRUCTION: &str = "Give the most up-to-date answer you can. \
Cite the web results that support it using their numbers, like [1].";

/// Builds the single text block sent to the model.
///
/// Results are numbered from 1 in the order given; the completion is asked
/// to cite those numbers, so the order must match what the caller returns as
/// sources.
pub fn assemble(question: &str, results: &[SearchResult]) -> String {
    let web_results = if results.is_empty() {
        NO_RESULTS.to_string()
    } else {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}\n{}\n{}", i + 1, r.title, r.snippet, r.url))
            .collect::<Vec<String>>()
            .join("\n\n")
    };

    format!(
        "WEB SEARCH RESULTS:\n{}\n\nQUESTION:\n{}\n\n{}",
        web_results, question, ANSWER_INSTRUCTION
    )
}
