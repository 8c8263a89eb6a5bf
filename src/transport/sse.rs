//! Incremental SSE frame decoding.
//!
//! The service replies with standard SSE framing: optional `event:` lines,
//! one or more `data:` lines, a blank line terminating each event. Network
//! chunks split lines (and UTF-8 sequences) at arbitrary byte offsets, so the
//! decoder buffers raw bytes and only surfaces complete events.

use serde_json::Value;
use tracing::debug;

/// Event kind used when the server omits the `event:` line.
const DEFAULT_KIND: &str = "message";

/// One decoded protocol frame: an event kind and its JSON payload.
///
/// A `data:` block holding a JSON array is fanned out into one frame per
/// element, so the payload here is always a single JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Event kind from the `event:` line, `"message"` when absent
    pub kind: String,
    /// Decoded JSON payload
    pub payload: Value,
}

/// Outcome of decoding one complete `data:` block.
///
/// Malformed JSON is a recoverable condition: the block is skipped with a
/// reason and the stream keeps going.
#[derive(Debug)]
pub enum DataDecode {
    /// The block decoded into one or more frames
    Frames(Vec<Frame>),
    /// The block was dropped; the reason is logged, not propagated
    Skipped(String),
}

/// Incremental decoder turning raw body chunks into [`Frame`]s.
#[derive(Debug, Default)]
pub struct EventFrameDecoder {
    buffer: Vec<u8>,
    event_kind: Option<String>,
    data: String,
}

impl EventFrameDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a raw chunk and returns every frame completed by it.
    ///
    /// Chunks may split lines or multi-byte characters anywhere; partial
    /// input stays buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = Self::line_text(&line_bytes[..line_bytes.len() - 1]);
            self.handle_line(&line, &mut frames);
        }
        frames
    }

    /// Flushes any unterminated trailing event.
    ///
    /// Servers may omit the final blank line (and even the final newline) at
    /// stream end; leftover buffered text is treated as a terminated event.
    pub fn finish(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();

        if !self.buffer.is_empty() {
            let line_bytes = std::mem::take(&mut self.buffer);
            let line = Self::line_text(&line_bytes);
            self.handle_line(&line, &mut frames);
        }
        self.terminate_event(&mut frames);

        frames
    }

    /// Decodes one complete `data:` block into frames.
    ///
    /// A JSON array yields one frame per element in array order; any other
    /// JSON value yields a single frame. Malformed JSON yields `Skipped`.
    pub fn decode_data(kind: &str, data: &str) -> DataDecode {
        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => return DataDecode::Skipped(format!("malformed JSON: {}", e)),
        };

        let frames = match value {
            Value::Array(items) => items
                .into_iter()
                .map(|payload| Frame {
                    kind: kind.to_string(),
                    payload,
                })
                .collect(),
            payload => vec![Frame {
                kind: kind.to_string(),
                payload,
            }],
        };

        DataDecode::Frames(frames)
    }

    fn line_text(bytes: &[u8]) -> String {
        let mut line = String::from_utf8_lossy(bytes).into_owned();
        if line.ends_with('\r') {
            line.pop();
        }
        line
    }

    fn handle_line(&mut self, line: &str, frames: &mut Vec<Frame>) {
        if line.is_empty() {
            self.terminate_event(frames);
        } else if let Some(rest) = line.strip_prefix("event:") {
            self.event_kind = Some(strip_one_space(rest).to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(strip_one_space(rest));
        }
        // Other fields (id:, retry:, comments) are not used by this protocol.
    }

    fn terminate_event(&mut self, frames: &mut Vec<Frame>) {
        if !self.data.is_empty() {
            let kind = self
                .event_kind
                .take()
                .unwrap_or_else(|| DEFAULT_KIND.to_string());
            match Self::decode_data(&kind, &self.data) {
                DataDecode::Frames(mut decoded) => frames.append(&mut decoded),
                DataDecode::Skipped(reason) => {
                    debug!(%reason, "dropping undecodable SSE data block");
                }
            }
            self.data.clear();
        }
        self.event_kind = None;
    }
}

// SSE allows exactly one space after the field colon.
fn strip_one_space(value: &str) -> &str {
    value.strip_prefix(' ').unwrap_or(value)
}
