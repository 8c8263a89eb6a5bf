//! Ask service implementation: one request/response exchange.

use super::accumulator::ResponseAccumulator;
use super::answer;
use super::request::{IdGenerator, RequestBuilder, UuidGenerator};
use super::stream::AskStream;
use super::types::{AskOptions, AskResult, FinalAnswer, StepPayload};
use crate::auth::PerplexityAuth;
use crate::errors::{PerplexityError, PerplexityResult};
use crate::stealth::HeaderGenerator;
use crate::transport::{EventFrameDecoder, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::sync::Arc;
use url::Url;

/// Path of the conversational search endpoint.
pub const ASK_ENDPOINT: &str = "/rest/sse/perplexity_ask";

/// Ask service trait for testability
#[async_trait]
pub trait AskService: Send + Sync {
    /// Ask a question and wait for the complete answer.
    ///
    /// Returns one result built from the terminal payload; if the stream
    /// ended without one, the result has empty text and whatever continuity
    /// identifiers were observed. Pass a prior result as `follow_up` to stay
    /// in its thread.
    async fn ask(
        &self,
        query: &str,
        options: &AskOptions,
        follow_up: Option<&AskResult>,
    ) -> PerplexityResult<AskResult>;

    /// Ask a question and stream incremental results as they arrive.
    async fn ask_stream(
        &self,
        query: &str,
        options: &AskOptions,
        follow_up: Option<&AskResult>,
    ) -> PerplexityResult<AskStream>;
}

/// Implementation of the ask service.
pub struct AskServiceImpl<G: IdGenerator = UuidGenerator> {
    transport: Arc<dyn HttpTransport>,
    auth: PerplexityAuth,
    header_gen: HeaderGenerator,
    builder: RequestBuilder<G>,
    base_url: Url,
}

impl AskServiceImpl<UuidGenerator> {
    /// Creates an ask service with the default id generator.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: PerplexityAuth,
        header_gen: HeaderGenerator,
        base_url: Url,
        language: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        let user_id = auth.user_nextauth_id.clone();
        Self {
            transport,
            auth,
            header_gen,
            builder: RequestBuilder::new(language, timezone, user_id),
            base_url,
        }
    }
}

impl<G: IdGenerator> AskServiceImpl<G> {
    /// Creates an ask service with an explicit request builder (for testing).
    pub fn with_builder(
        transport: Arc<dyn HttpTransport>,
        auth: PerplexityAuth,
        header_gen: HeaderGenerator,
        base_url: Url,
        builder: RequestBuilder<G>,
    ) -> Self {
        Self {
            transport,
            auth,
            header_gen,
            builder,
            base_url,
        }
    }

    fn endpoint_url(&self) -> PerplexityResult<Url> {
        self.base_url
            .join(ASK_ENDPOINT)
            .map_err(|e| PerplexityError::Configuration {
                message: format!("Invalid endpoint URL: {}", e),
            })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = self.header_gen.request_headers(true);
        headers.extend(self.auth.to_headers());
        headers
    }

    fn prepare(
        &self,
        query: &str,
        options: &AskOptions,
        follow_up: Option<&AskResult>,
    ) -> PerplexityResult<(Url, HeaderMap, Bytes)> {
        let request = self.builder.build(query, options, follow_up)?;
        let url = self.endpoint_url()?;
        let headers = self.build_headers();
        let body = Bytes::from(serde_json::to_vec(&request)?);
        Ok((url, headers, body))
    }

    /// Builds the blocking-mode result from a fully buffered SSE body.
    fn resolve_body(body: &[u8]) -> AskResult {
        let mut decoder = EventFrameDecoder::new();
        let mut accumulator = ResponseAccumulator::new();
        let mut final_answer: Option<FinalAnswer> = None;

        let mut frames = decoder.feed(body);
        frames.extend(decoder.finish());

        for frame in frames {
            let step = match StepPayload::from_value(frame.payload) {
                Some(step) => step,
                None => continue,
            };
            let terminal = answer::is_terminal(&step);
            accumulator.observe(&step);
            if terminal && final_answer.is_none() {
                final_answer = Some(answer::extract(&step));
            }
        }

        let answer = final_answer.unwrap_or_default();
        AskResult {
            text: answer.text,
            web_results: answer.web_results,
            structured_answer: answer.structured_answer,
            continuity: accumulator.continuity().clone(),
            mode: accumulator.mode().map(str::to_string),
            model: accumulator.display_model().map(str::to_string),
        }
    }
}

#[async_trait]
impl<G: IdGenerator> AskService for AskServiceImpl<G> {
    async fn ask(
        &self,
        query: &str,
        options: &AskOptions,
        follow_up: Option<&AskResult>,
    ) -> PerplexityResult<AskResult> {
        let (url, headers, body) = self.prepare(query, options, follow_up)?;

        let response = self
            .transport
            .send(Method::POST, url, headers, Some(body))
            .await?;

        Ok(Self::resolve_body(response.body()))
    }

    async fn ask_stream(
        &self,
        query: &str,
        options: &AskOptions,
        follow_up: Option<&AskResult>,
    ) -> PerplexityResult<AskStream> {
        let (url, headers, body) = self.prepare(query, options, follow_up)?;

        let stream = self
            .transport
            .send_streaming(Method::POST, url, headers, Some(body))
            .await?;

        Ok(AskStream::new(stream))
    }
}
