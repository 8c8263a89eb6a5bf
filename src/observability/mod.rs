//! Observability support.
//!
//! Structured logging configuration; log call sites throughout the crate use
//! `tracing` directly.

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
