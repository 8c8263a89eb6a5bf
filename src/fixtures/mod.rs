//! Test fixtures: canned SSE bodies and step payloads.

use serde_json::{json, Value};

/// Renders one SSE event block with the given data payload.
pub fn sse_event(payload: &Value) -> String {
    format!("event: message\ndata: {}\n\n", payload)
}

/// An intermediate step payload carrying cumulative text.
pub fn streaming_step(text: &str, backend_uuid: &str) -> Value {
    json!({
        "step_type": "SEARCH",
        "text": text,
        "uuid": "thread-1",
        "backend_uuid": backend_uuid,
        "context_uuid": "ctx-1",
        "thread_url_slug": "what-is-rust",
        "display_model": "pplx_pro",
        "mode": "concise",
    })
}

/// The terminal step payload with a double-encoded answer document.
pub fn terminal_step(answer_text: &str, citations: Value) -> Value {
    let inner = json!({
        "answer": answer_text,
        "web_results": citations,
        "structured_answer": null,
    });
    json!({
        "step_type": "FINAL",
        "text": answer_text,
        "uuid": "thread-1",
        "backend_uuid": "backend-final",
        "context_uuid": "ctx-1",
        "thread_url_slug": "what-is-rust",
        "display_model": "pplx_pro",
        "mode": "concise",
        "content": {"answer": inner.to_string()},
    })
}

/// A complete SSE response body: two growing snapshots then the terminal step.
pub fn complete_ask_body(answer_text: &str) -> String {
    let mut body = String::new();
    let half = &answer_text[..answer_text.len() / 2];
    body.push_str(&sse_event(&streaming_step(half, "backend-1")));
    body.push_str(&sse_event(&streaming_step(answer_text, "backend-2")));
    body.push_str(&sse_event(&terminal_step(
        answer_text,
        json!([{"name": "Example", "url": "https://example.com"}]),
    )));
    body
}
