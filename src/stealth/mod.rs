//! Browser-like request header generation.
//!
//! The service expects headers matching its own mobile app. This module
//! reproduces that header set; it does not attempt to defeat any particular
//! anti-bot measure and assumes the transport can deliver the response.

use http::HeaderMap;
use uuid::Uuid;

const USER_AGENT: &str = "Ask/2.250911.0/16709 (iOS; iPhone; 18.7.0) isiOSOnMac/false";
const APP_VERSION: &str = "2.250911.0";
const API_VERSION: &str = "2.18";
const CLIENT_NAME: &str = "Perplexity-iOS";
const CLIENT_ENV: &str = "production";

/// Generates browser-like headers for Perplexity requests.
#[derive(Debug, Clone)]
pub struct HeaderGenerator {
    device_id: String,
    language: String,
}

impl HeaderGenerator {
    /// Creates a generator; a fresh device id is minted when none is given.
    pub fn new(device_id: Option<String>, language: impl Into<String>) -> Self {
        Self {
            device_id: device_id.unwrap_or_else(generate_device_id),
            language: language.into(),
        }
    }

    /// The device identifier in use.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Headers common to every request.
    fn base_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, "user-agent", USER_AGENT);
        insert(&mut headers, "accept", "*/*");
        insert(&mut headers, "accept-language", &self.language);
        insert(&mut headers, "accept-encoding", "gzip, deflate, br");
        insert(&mut headers, "connection", "keep-alive");
        insert(&mut headers, "pragma", "no-cache");
        insert(&mut headers, "cache-control", "no-cache");
        headers
    }

    /// Headers for JSON API requests.
    fn api_headers(&self) -> HeaderMap {
        let mut headers = self.base_headers();
        insert(&mut headers, "x-client-name", CLIENT_NAME);
        insert(&mut headers, "x-app-apiclient", "ios");
        insert(&mut headers, "x-device-id", &self.device_id);
        insert(&mut headers, "x-app-version", APP_VERSION);
        insert(&mut headers, "x-client-env", CLIENT_ENV);
        insert(&mut headers, "x-app-apiversion", API_VERSION);
        insert(&mut headers, "content-type", "application/json");
        headers
    }

    /// Sentry tracing headers, regenerated per request.
    fn sentry_headers(&self) -> HeaderMap {
        let trace_id = Uuid::new_v4().simple().to_string();
        let span_id = &Uuid::new_v4().simple().to_string()[..16];

        let mut headers = HeaderMap::new();
        insert(
            &mut headers,
            "sentry-trace",
            &format!("{}-{}-0", trace_id, span_id),
        );
        insert(
            &mut headers,
            "baggage",
            &format!(
                "sentry-environment={},sentry-release=ai.perplexity.app%40{}%2B16709,sentry-trace_id={}",
                CLIENT_ENV, APP_VERSION, trace_id
            ),
        );
        headers
    }

    /// The complete header set for one request.
    ///
    /// `streaming` swaps the Accept header for `text/event-stream`.
    pub fn request_headers(&self, streaming: bool) -> HeaderMap {
        let mut headers = self.api_headers();
        if streaming {
            insert(&mut headers, "accept", "text/event-stream");
        }
        headers.extend(self.sentry_headers());
        headers
    }
}

/// Generates a device id in the iOS format the service expects.
pub fn generate_device_id() -> String {
    format!("ios:{}", Uuid::new_v4())
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = value.parse() {
        headers.insert(name, value);
    }
}
