//! HTTP transport implementations.

use crate::errors::{PerplexityError, PerplexityResult};
use crate::transport::{ByteStream, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, Response, StatusCode};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Maximum number of body bytes carried in a `RequestFailed` message.
const ERROR_BODY_EXCERPT_LEN: usize = 512;

/// Reqwest-based HTTP transport implementation.
///
/// The configured timeout bounds the whole exchange, body included; dropping
/// a returned stream aborts the underlying connection.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport with the given exchange timeout
    pub fn new(timeout: Duration) -> PerplexityResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PerplexityError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    fn to_reqwest_method(&self, method: Method) -> reqwest::Method {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
            Method::PATCH => reqwest::Method::PATCH,
            _ => reqwest::Method::GET,
        }
    }

    fn to_reqwest_headers(&self, headers: HeaderMap) -> reqwest::header::HeaderMap {
        let mut reqwest_headers = reqwest::header::HeaderMap::new();
        for (name, value) in headers.iter() {
            if let Ok(header_name) =
                reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes())
            {
                if let Ok(header_value) = reqwest::header::HeaderValue::from_bytes(value.as_bytes())
                {
                    reqwest_headers.insert(header_name, header_value);
                }
            }
        }
        reqwest_headers
    }

    fn map_http_error(&self, status: reqwest::StatusCode, body: &Bytes) -> PerplexityError {
        let body_str = String::from_utf8_lossy(body);
        let excerpt: String = body_str.chars().take(ERROR_BODY_EXCERPT_LEN).collect();

        match status.as_u16() {
            401 | 403 => PerplexityError::Authentication {
                message: format!("Authentication failed ({}): {}", status.as_u16(), excerpt),
            },
            other => PerplexityError::RequestFailed {
                status: other,
                message: excerpt,
            },
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<Response<Bytes>> {
        let reqwest_method = self.to_reqwest_method(method);
        let reqwest_headers = self.to_reqwest_headers(headers);

        let mut request = self
            .client
            .request(reqwest_method, url.as_str())
            .headers(reqwest_headers);

        if let Some(body_data) = body {
            request = request.body(body_data.to_vec());
        }

        let response = request.send().await?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let body_bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(self.map_http_error(status, &body_bytes));
        }

        let mut http_response =
            Response::builder().status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK));

        for (name, value) in response_headers.iter() {
            http_response = http_response.header(name.as_str(), value.as_bytes());
        }

        let response =
            http_response
                .body(body_bytes)
                .map_err(|e| PerplexityError::Internal {
                    message: format!("Failed to build response: {}", e),
                })?;

        Ok(response)
    }

    async fn send_streaming(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<ByteStream> {
        let reqwest_method = self.to_reqwest_method(method);
        let reqwest_headers = self.to_reqwest_headers(headers);

        let mut request = self
            .client
            .request(reqwest_method, url.as_str())
            .headers(reqwest_headers);

        if let Some(body_data) = body {
            request = request.body(body_data.to_vec());
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.bytes().await?;
            return Err(self.map_http_error(status, &body));
        }

        let stream = response.bytes_stream();
        let mapped_stream = Box::pin(futures::stream::unfold(stream, |mut stream| async move {
            use futures::StreamExt;
            match stream.next().await {
                Some(Ok(bytes)) => Some((Ok(bytes), stream)),
                Some(Err(e)) => Some((Err(PerplexityError::from(e)), stream)),
                None => None,
            }
        }));

        Ok(mapped_stream)
    }
}
