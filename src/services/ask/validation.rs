//! Argument validation for the ask endpoint.
//!
//! Everything here runs before any network call so callers get synchronous
//! `InvalidArgument` errors for bad input.

use crate::errors::{PerplexityError, PerplexityResult};

/// Longest query the service accepts.
const MAX_QUERY_LEN: usize = 20_000;

/// Validates the query text.
pub fn validate_query(query: &str) -> PerplexityResult<()> {
    if query.trim().is_empty() {
        return Err(PerplexityError::InvalidArgument {
            field: "query".to_string(),
            reason: "query text must not be empty".to_string(),
        });
    }

    if query.len() > MAX_QUERY_LEN {
        return Err(PerplexityError::InvalidArgument {
            field: "query".to_string(),
            reason: format!("query exceeds {} bytes", MAX_QUERY_LEN),
        });
    }

    Ok(())
}
