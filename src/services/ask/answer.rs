//! Terminal answer extraction.
//!
//! The service double-encodes the authoritative answer: the terminal step's
//! `content.answer` is a string which itself holds a JSON document with the
//! real `{answer, web_results, structured_answer}` object. Decoding failures
//! here are always recovered locally, never propagated.

use super::types::{Citation, FinalAnswer, StepPayload, TERMINAL_STEP_TYPE};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Shape of the inner (double-encoded) answer document.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InnerAnswer {
    answer: String,
    web_results: Vec<Citation>,
    structured_answer: Option<Value>,
}

/// Returns true when the payload is the terminal step carrying the answer.
pub fn is_terminal(step: &StepPayload) -> bool {
    step.step_type.as_deref() == Some(TERMINAL_STEP_TYPE)
}

/// Resolves a terminal payload into a [`FinalAnswer`].
///
/// A missing or empty `content.answer` yields an empty answer. A string that
/// fails the inner JSON parse is taken verbatim as the answer text with no
/// citations.
pub fn extract(step: &StepPayload) -> FinalAnswer {
    let answer_str = match step.answer_str() {
        Some(s) if !s.is_empty() => s,
        _ => return FinalAnswer::default(),
    };

    match serde_json::from_str::<InnerAnswer>(answer_str) {
        Ok(inner) => FinalAnswer {
            text: inner.answer,
            web_results: inner.web_results,
            structured_answer: inner.structured_answer,
        },
        Err(e) => {
            warn!(error = %e, "answer field was not valid JSON, using raw text");
            FinalAnswer {
                text: answer_str.to_string(),
                web_results: Vec::new(),
                structured_answer: None,
            }
        }
    }
}
