//! # Perplexity Conversational Search Client
//!
//! Production-ready Rust client for Perplexity's conversational search
//! service, spoken over HTTP with an SSE response stream.
//!
//! ## Features
//!
//! - Blocking and streaming ask with multi-turn thread continuity
//! - Incremental SSE decoding tolerant of arbitrary chunk boundaries
//! - Resolution of the service's double-JSON-encoded terminal answer
//! - Cumulative-text diffing into display deltas for live output
//! - Browser-like request headers and cookie/bearer credential handling
//! - Structured logging with `tracing`
//! - Type-safe request/response models
//! - London-School TDD with mock support
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_perplexity::{create_client, AskOptions, PerplexityClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_client(Default::default())?;
//!
//!     let result = client
//!         .ask()
//!         .ask("What is quantum computing?", &AskOptions::default(), None)
//!         .await?;
//!     println!("{}", result.text);
//!
//!     // Follow up in the same thread
//!     let more = client
//!         .ask()
//!         .ask("Explain it simpler", &AskOptions::default(), Some(&result))
//!         .await?;
//!     println!("{}", more.text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Main client interface and factory functions
//! - `config` - Configuration types and builder
//! - `auth` - Credential handling (cookies, bearer token)
//! - `stealth` - Browser-like request header generation
//! - `transport` - HTTP transport layer and SSE frame decoding
//! - `errors` - Error types and taxonomy
//! - `services` - The ask service: request building, answer extraction,
//!   delta accumulation and streaming
//! - `observability` - Logging configuration
//! - `mocks` - Mock implementations for testing
//! - `fixtures` - Test fixtures and helper data

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod stealth;
pub mod transport;

// Development/testing modules
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mocks;

// Re-exports for convenience
pub use auth::PerplexityAuth;
pub use client::{create_client, create_client_from_env, PerplexityClient, PerplexityClientImpl};
pub use config::{PerplexityConfig, PerplexityConfigBuilder};
pub use errors::{PerplexityError, PerplexityResult};
pub use observability::{LogFormat, LogLevel, LoggingConfig};
pub use stealth::HeaderGenerator;
pub use transport::{EventFrameDecoder, Frame, HttpTransport, ReqwestTransport};

// Service re-exports
pub use services::ask::{
    AskOptions, AskRequest, AskResult, AskService, AskServiceImpl, AskStream, Citation,
    ConversationContinuity, FinalAnswer, Mode, ModelPreference, RequestBuilder,
    ResponseAccumulator, Source, StepPayload,
};

/// The default Perplexity service base URL
pub const DEFAULT_BASE_URL: &str = "https://www.perplexity.ai";

/// The default whole-exchange timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// The default Accept-Language value
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// The default timezone echoed in request parameters
pub const DEFAULT_TIMEZONE: &str = "UTC";
