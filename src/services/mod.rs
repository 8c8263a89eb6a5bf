//! Service implementations for the Perplexity API.
//!
//! Each service module provides a trait (for mocking) and a concrete
//! implementation wired to the HTTP transport.

pub mod ask;
