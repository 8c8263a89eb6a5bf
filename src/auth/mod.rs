//! Authentication and credential handling for the Perplexity service.
//!
//! Credentials come from a logged-in browser session (cookies and optionally
//! a bearer token). All of them are optional: anonymous asks work, they just
//! lose access to account-gated models and threads.

use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

const SESSION_COOKIE: &str = "__Secure-next-auth.session-token";
const CSRF_COOKIE: &str = "next-auth.csrf-token";
const CLEARANCE_COOKIE: &str = "cf_clearance";

/// Authentication credentials for the Perplexity service.
#[derive(Clone, Default)]
pub struct PerplexityAuth {
    /// JWT bearer token from the Authorization header
    pub bearer_token: Option<SecretString>,
    /// NextAuth session token cookie
    pub session_token: Option<SecretString>,
    /// CSRF token cookie
    pub csrf_token: Option<SecretString>,
    /// Cloudflare clearance cookie
    pub cf_clearance: Option<SecretString>,
    /// User NextAuth id, echoed in request parameters when present
    pub user_nextauth_id: Option<String>,
}

impl PerplexityAuth {
    /// Creates anonymous (unauthenticated) credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates credentials from a browser cookie jar.
    pub fn from_cookies(cookies: &HashMap<String, String>) -> Self {
        Self {
            bearer_token: None,
            session_token: cookies
                .get(SESSION_COOKIE)
                .map(|v| SecretString::new(v.clone())),
            csrf_token: cookies
                .get(CSRF_COOKIE)
                .map(|v| SecretString::new(v.clone())),
            cf_clearance: cookies
                .get(CLEARANCE_COOKIE)
                .map(|v| SecretString::new(v.clone())),
            user_nextauth_id: None,
        }
    }

    /// Sets the bearer token.
    pub fn with_bearer_token(mut self, token: SecretString) -> Self {
        self.bearer_token = Some(token);
        self
    }

    /// Sets the user NextAuth id.
    pub fn with_user_nextauth_id(mut self, id: impl Into<String>) -> Self {
        self.user_nextauth_id = Some(id.into());
        self
    }

    /// Returns the authentication headers for a request.
    ///
    /// Includes an `Authorization` header when a bearer token is set and a
    /// `Cookie` header when any session cookies are present.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(token) = &self.bearer_token {
            if let Ok(value) = format!("Bearer {}", token.expose_secret()).parse() {
                headers.insert(http::header::AUTHORIZATION, value);
            }
        }

        if let Some(cookie) = self.cookie_header() {
            if let Ok(value) = cookie.parse() {
                headers.insert(http::header::COOKIE, value);
            }
        }

        headers
    }

    /// Builds the `Cookie` header value, if any cookie is set.
    pub fn cookie_header(&self) -> Option<String> {
        let mut pairs = Vec::new();

        if let Some(token) = &self.session_token {
            pairs.push(format!("{}={}", SESSION_COOKIE, token.expose_secret()));
        }
        if let Some(token) = &self.csrf_token {
            pairs.push(format!("{}={}", CSRF_COOKIE, token.expose_secret()));
        }
        if let Some(token) = &self.cf_clearance {
            pairs.push(format!("{}={}", CLEARANCE_COOKIE, token.expose_secret()));
        }

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Returns true if any credential capable of identifying a user is set.
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some() || self.session_token.is_some()
    }
}

impl std::fmt::Debug for PerplexityAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerplexityAuth")
            .field("bearer_token", &self.bearer_token.is_some())
            .field("session_token", &self.session_token.is_some())
            .field("csrf_token", &self.csrf_token.is_some())
            .field("cf_clearance", &self.cf_clearance.is_some())
            .field("user_nextauth_id", &self.user_nextauth_id)
            .finish()
    }
}
