//! Error types for the Perplexity API client.
//!
//! This module provides the error taxonomy used across the crate.

mod error;

pub use error::{PerplexityError, PerplexityResult};
