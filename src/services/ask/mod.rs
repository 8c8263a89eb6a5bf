//! Conversational search ("ask") service
//!
//! This module implements the streaming ask protocol: building the outbound
//! query payload, decoding the SSE response, resolving the double-encoded
//! terminal answer and diffing cumulative text into display deltas.

mod accumulator;
mod answer;
mod request;
mod service;
mod stream;
mod types;
mod validation;


// Re-export public types
pub use accumulator::{Phase, ResponseAccumulator};
pub use answer::{extract, is_terminal};
pub use request::{IdGenerator, RequestBuilder, UuidGenerator};
pub use service::{AskService, AskServiceImpl, ASK_ENDPOINT};
pub use stream::AskStream;
pub use types::{
    AskOptions, AskParams, AskRequest, AskResult, Citation, ConversationContinuity, FinalAnswer,
    Mode, ModelPreference, Source, StepPayload, TERMINAL_STEP_TYPE,
};
pub use validation::validate_query;
