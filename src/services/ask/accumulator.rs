//! Cumulative-text tracking across one ask exchange.

use super::answer::is_terminal;
use super::types::{ConversationContinuity, StepPayload};

/// Accumulator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing with text observed yet
    NoData,
    /// Deltas are being produced
    Accumulating,
    /// A terminal payload was seen; later payloads are ignored
    Final,
}

/// Tracks cumulative text across a frame sequence and computes display deltas.
///
/// Each streaming payload carries "all text produced so far", so a delta is
/// the suffix beyond the previously observed text. Continuity identifiers are
/// captured from every payload, terminal or not, and the latest values win.
#[derive(Debug)]
pub struct ResponseAccumulator {
    phase: Phase,
    seen_text: String,
    continuity: ConversationContinuity,
    mode: Option<String>,
    display_model: Option<String>,
}

impl ResponseAccumulator {
    /// Creates an empty accumulator for one exchange.
    pub fn new() -> Self {
        Self {
            phase: Phase::NoData,
            seen_text: String::new(),
            continuity: ConversationContinuity::default(),
            mode: None,
            display_model: None,
        }
    }

    /// Observes one payload and returns the text delta to emit, if any.
    ///
    /// Terminal is sticky: once the terminal payload has been consumed,
    /// further payloads are ignored entirely.
    pub fn observe(&mut self, step: &StepPayload) -> Option<String> {
        if self.phase == Phase::Final {
            return None;
        }

        self.continuity.absorb(step);
        if let Some(mode) = &step.mode {
            self.mode = Some(mode.clone());
        }
        if let Some(model) = &step.display_model {
            self.display_model = Some(model.clone());
        }

        let delta = match &step.text {
            Some(text) if !text.is_empty() && *text != self.seen_text => {
                let delta = if text.starts_with(self.seen_text.as_str()) {
                    text[self.seen_text.len()..].to_string()
                } else {
                    // The server restarted or rewrote the stream; re-emit the
                    // full new text instead of slicing past its end.
                    text.clone()
                };
                self.seen_text = text.clone();
                self.phase = Phase::Accumulating;
                Some(delta)
            }
            _ => None,
        };

        if is_terminal(step) {
            self.phase = Phase::Final;
        }

        delta
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Latest continuity identifiers observed so far.
    pub fn continuity(&self) -> &ConversationContinuity {
        &self.continuity
    }

    /// Mode echoed by the server, if any payload carried one.
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Model the server reported using, if any payload carried one.
    pub fn display_model(&self) -> Option<&str> {
        self.display_model.as_deref()
    }
}

impl Default for ResponseAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
