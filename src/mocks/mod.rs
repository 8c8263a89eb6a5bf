//! Mock implementations for testing.
//!
//! This module provides mock implementations of core traits to support
//! London-School TDD practices.

use crate::errors::{PerplexityError, PerplexityResult};
use crate::transport::{ByteStream, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use http::{HeaderMap, Method, Response};
use mockall::mock;
use std::sync::{Arc, Mutex};
use url::Url;

/// Mock HTTP transport replaying scripted responses.
pub struct MockHttpTransport {
    response: Arc<Mutex<Option<PerplexityResult<Response<Bytes>>>>>,
    stream_chunks: Arc<Mutex<Vec<PerplexityResult<Bytes>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// One request observed by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Full request URL
    pub url: Url,
    /// Request headers as sent
    pub headers: HeaderMap,
    /// Request body, if any
    pub body: Option<Bytes>,
}

impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            stream_chunks: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the buffered response for the next `send`
    pub fn expect_response(&self, status: u16, body: impl Into<Bytes>) {
        let response = Response::builder()
            .status(status)
            .body(body.into())
            .unwrap();
        *self.response.lock().unwrap() = Some(Ok(response));
    }

    /// Script an error for the next `send`
    pub fn expect_error(&self, error: PerplexityError) {
        *self.response.lock().unwrap() = Some(Err(error));
    }

    /// Script the chunk sequence for the next `send_streaming`
    pub fn expect_stream(&self, chunks: Vec<PerplexityResult<Bytes>>) {
        *self.stream_chunks.lock().unwrap() = chunks;
    }

    /// Requests observed so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: Method, url: Url, headers: HeaderMap, body: Option<Bytes>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url,
            headers,
            body,
        });
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<Response<Bytes>> {
        self.record(method, url, headers, body);

        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| {
                Err(PerplexityError::Internal {
                    message: "No mock response configured".to_string(),
                })
            })
    }

    async fn send_streaming(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<ByteStream> {
        self.record(method, url, headers, body);

        let chunks = std::mem::take(&mut *self.stream_chunks.lock().unwrap());
        Ok(Box::pin(stream::iter(chunks)) as ByteStream)
    }
}

// Mockall-based mock for expectation-style tests
mock! {
    pub Transport {}

    #[async_trait]
    impl HttpTransport for Transport {
        async fn send(
            &self,
            method: Method,
            url: Url,
            headers: HeaderMap,
            body: Option<Bytes>,
        ) -> PerplexityResult<Response<Bytes>>;

        async fn send_streaming(
            &self,
            method: Method,
            url: Url,
            headers: HeaderMap,
            body: Option<Bytes>,
        ) -> PerplexityResult<ByteStream>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_response() {
        let transport = MockHttpTransport::new();
        transport.expect_response(200, "ok");

        let result = transport
            .send(
                Method::POST,
                Url::parse("https://example.com/test").unwrap(),
                HeaderMap::new(),
                Some(Bytes::from("{}")),
            )
            .await
            .unwrap();

        assert_eq!(result.status(), 200);
        assert_eq!(result.body(), &Bytes::from("ok"));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.requests()[0].method, Method::POST);
    }

    #[tokio::test]
    async fn test_mockall_transport_expectations() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_, _, _, _| {
            Ok(Response::builder()
                .status(200)
                .body(Bytes::from("ok"))
                .unwrap())
        });

        let response = transport
            .send(
                Method::GET,
                Url::parse("https://example.com").unwrap(),
                HeaderMap::new(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_mock_transport_unconfigured_is_error() {
        let transport = MockHttpTransport::new();
        let result = transport
            .send(
                Method::GET,
                Url::parse("https://example.com").unwrap(),
                HeaderMap::new(),
                None,
            )
            .await;
        assert!(result.is_err());
    }
}
