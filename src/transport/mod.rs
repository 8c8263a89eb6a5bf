//! HTTP transport layer and SSE frame decoding.

mod http_transport;
mod sse;

pub use http_transport::ReqwestTransport;
pub use sse::{DataDecode, EventFrameDecoder, Frame};

use crate::errors::PerplexityResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use http::{HeaderMap, Method, Response};
use std::pin::Pin;
use url::Url;

/// A boxed stream of raw response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = PerplexityResult<Bytes>> + Send>>;

/// HTTP transport trait for making requests to the Perplexity service.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and buffer the whole response body
    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<Response<Bytes>>;

    /// Send a request and return the response body as a chunk stream
    async fn send_streaming(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> PerplexityResult<ByteStream>;
}
