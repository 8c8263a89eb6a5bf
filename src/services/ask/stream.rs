//! Streaming ask responses.

use super::accumulator::{Phase, ResponseAccumulator};
use super::answer;
use super::types::{AskResult, StepPayload};
use crate::errors::PerplexityResult;
use crate::transport::{ByteStream, EventFrameDecoder, Frame};
use futures::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

pin_project! {
    /// Pull-based stream of incremental [`AskResult`]s for one exchange.
    ///
    /// Each item's `text` is the newly appeared suffix since the previous
    /// item; continuity identifiers are repeated on every item. The stream
    /// ends after the terminal payload (whose item also carries the final
    /// citations) or when the transport closes. Dropping the stream aborts
    /// the underlying connection; no frames are processed past that point.
    pub struct AskStream {
        #[pin]
        inner: ByteStream,
        decoder: EventFrameDecoder,
        accumulator: ResponseAccumulator,
        pending: VecDeque<AskResult>,
        is_done: bool,
    }
}

impl AskStream {
    /// Wraps a transport byte stream.
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            decoder: EventFrameDecoder::new(),
            accumulator: ResponseAccumulator::new(),
            pending: VecDeque::new(),
            is_done: false,
        }
    }

    fn ingest(
        accumulator: &mut ResponseAccumulator,
        pending: &mut VecDeque<AskResult>,
        frames: Vec<Frame>,
    ) {
        for frame in frames {
            let step = match StepPayload::from_value(frame.payload) {
                Some(step) => step,
                None => {
                    debug!(kind = %frame.kind, "skipping frame with non-object payload");
                    continue;
                }
            };

            let terminal = answer::is_terminal(&step);
            let delta = accumulator.observe(&step);

            if terminal {
                // The terminal item always goes out, even with no new text,
                // so streaming consumers still receive the citations.
                let final_answer = answer::extract(&step);
                pending.push_back(AskResult {
                    text: delta.unwrap_or_default(),
                    web_results: final_answer.web_results,
                    structured_answer: final_answer.structured_answer,
                    continuity: accumulator.continuity().clone(),
                    mode: accumulator.mode().map(str::to_string),
                    model: accumulator.display_model().map(str::to_string),
                });
            } else if let Some(delta) = delta {
                pending.push_back(AskResult {
                    text: delta,
                    web_results: Vec::new(),
                    structured_answer: None,
                    continuity: accumulator.continuity().clone(),
                    mode: accumulator.mode().map(str::to_string),
                    model: accumulator.display_model().map(str::to_string),
                });
            }
        }
    }
}

impl Stream for AskStream {
    type Item = PerplexityResult<AskResult>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(result) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(result)));
            }

            if *this.is_done {
                return Poll::Ready(None);
            }

            // Terminal is sticky; stop reading the transport once seen.
            if this.accumulator.phase() == Phase::Final {
                *this.is_done = true;
                continue;
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let frames = this.decoder.feed(&bytes);
                    Self::ingest(this.accumulator, this.pending, frames);
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.is_done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    let frames = this.decoder.finish();
                    Self::ingest(this.accumulator, this.pending, frames);
                    *this.is_done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
