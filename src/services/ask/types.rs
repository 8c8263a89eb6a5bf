//! Request and response types for the ask endpoint.

use crate::errors::PerplexityError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// `step_type` value marking the payload that carries the authoritative answer.
pub const TERMINAL_STEP_TYPE: &str = "FINAL";

/// Query mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Quick single-pass answer
    #[default]
    Concise,
    /// Multi-step assisted search
    Copilot,
    /// Deep research with the pro model
    Research,
}

/// Search source set element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// General web search
    Web,
    /// Academic sources
    Scholar,
    /// Social media sources
    Social,
}

impl FromStr for Source {
    type Err = PerplexityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Source::Web),
            "scholar" => Ok(Source::Scholar),
            "social" => Ok(Source::Social),
            other => Err(PerplexityError::InvalidArgument {
                field: "sources".to_string(),
                reason: format!("unknown source '{}', expected web, scholar or social", other),
            }),
        }
    }
}

/// Model selection sent as `model_preference`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPreference {
    /// The service's default pro model
    PplxPro,
    /// Claude 3.7 Sonnet with thinking
    Claude37SonnetThinking,
    /// GPT-4o
    Gpt4o,
    /// GPT-4.5
    Gpt45,
    /// o3-mini
    O3Mini,
    /// DeepSeek R1
    R1,
    /// Sonar
    Sonar,
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Grok 2
    Grok2,
    /// Any other model identifier accepted by the service
    Custom(String),
}

impl ModelPreference {
    /// Returns the wire identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            ModelPreference::PplxPro => "pplx_pro",
            ModelPreference::Claude37SonnetThinking => "claude37sonnetthinking",
            ModelPreference::Gpt4o => "gpt-4o",
            ModelPreference::Gpt45 => "gpt-4.5",
            ModelPreference::O3Mini => "o3-mini",
            ModelPreference::R1 => "r1",
            ModelPreference::Sonar => "sonar",
            ModelPreference::Gemini20Flash => "gemini 2.0 flash",
            ModelPreference::Grok2 => "grok-2",
            ModelPreference::Custom(s) => s,
        }
    }
}

impl Serialize for ModelPreference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Caller-facing options for one ask exchange.
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Response mode
    pub mode: Mode,
    /// Explicit model override; wins over the mode-derived default
    pub model: Option<ModelPreference>,
    /// Search sources; empty means `[web]`
    pub sources: Vec<Source>,
    /// Incognito flag: the exchange is excluded from account history
    pub incognito: bool,
}

/// Parameters object of the outbound ask request.
#[derive(Debug, Clone, Serialize)]
pub struct AskParams {
    /// Read/write token, unused for anonymous sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_write_token: Option<String>,
    /// Voice-to-voice flag
    pub is_voice_to_voice: bool,
    /// Model preference; absent lets the server pick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_preference: Option<ModelPreference>,
    /// Response block kinds the client can render
    pub supported_block_use_cases: Vec<String>,
    /// Where the query originated in the app
    pub query_source: String,
    /// Whether this is a related-query suggestion
    pub is_related_query: bool,
    /// Fresh per-request correlation id
    pub frontend_uuid: String,
    /// Accept-Language value
    pub language: String,
    /// IANA timezone
    pub timezone: String,
    /// User NextAuth id when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_nextauth_id: Option<String>,
    /// Fresh per-request context correlation id
    pub frontend_context_uuid: String,
    /// Search source set
    pub sources: Vec<Source>,
    /// Requests the schematized response format this crate decodes
    pub use_schematized_api: bool,
    /// Incognito flag
    pub is_incognito: bool,
    /// Backend uuid of the prior turn when continuing a thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_backend_uuid: Option<String>,
    /// Query mode
    pub mode: Mode,
}

/// Block kinds advertised in `supported_block_use_cases`.
pub(crate) fn default_block_use_cases() -> Vec<String> {
    [
        "answer_modes",
        "media_items",
        "knowledge_cards",
        "place_widgets",
        "shopping_widgets",
        "sports_widgets",
        "finance_widgets",
        "jobs_widgets",
        "placeholder_cards",
        "maps_preview",
        "search_result_widgets",
        "diff_blocks",
        "inline_images",
        "inline_assets",
        "inline_entity_cards",
        "inline_finance_widgets",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Outbound payload for the ask endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    /// Query text
    pub query_str: String,
    /// Parameters object
    pub params: AskParams,
}

/// One business object decoded from a frame's payload.
///
/// Only the fields this engine reads are declared; everything else in the
/// payload is ignored. `text` is cumulative ("all text so far"), not a delta.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StepPayload {
    /// Step discriminator; [`TERMINAL_STEP_TYPE`] marks the final step
    pub step_type: Option<String>,
    /// Free-form step content; the terminal step carries `content.answer`
    pub content: Option<Value>,
    /// Cumulative text produced so far
    pub text: Option<String>,
    /// Thread uuid
    pub uuid: Option<String>,
    /// Backend uuid, echoed as `last_backend_uuid` on follow-ups
    pub backend_uuid: Option<String>,
    /// Context uuid
    pub context_uuid: Option<String>,
    /// URL slug of the thread
    pub thread_url_slug: Option<String>,
    /// Model the server actually used
    pub display_model: Option<String>,
    /// Mode the server actually used
    pub mode: Option<String>,
}

impl StepPayload {
    /// Decodes a frame payload; `None` when the payload is not a step object.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// The double-encoded answer string of a terminal step, if present.
    pub fn answer_str(&self) -> Option<&str> {
        self.content.as_ref()?.get("answer")?.as_str()
    }
}

/// One citation record from `web_results`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Citation {
    /// Source title
    pub name: Option<String>,
    /// Source URL
    pub url: Option<String>,
    /// Snippet shown alongside the citation
    pub snippet: Option<String>,
    /// Remaining citation fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The resolved terminal answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalAnswer {
    /// Answer text
    pub text: String,
    /// Ordered citations
    pub web_results: Vec<Citation>,
    /// Structured answer data, when the service provides one
    pub structured_answer: Option<Value>,
}

/// Server-issued identifiers linking a follow-up to its thread.
///
/// Opaque: they must be echoed unmodified on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationContinuity {
    /// Thread uuid
    pub thread_uuid: Option<String>,
    /// Backend uuid
    pub backend_uuid: Option<String>,
    /// Context uuid
    pub context_uuid: Option<String>,
    /// URL slug of the thread
    pub thread_url_slug: Option<String>,
}

impl ConversationContinuity {
    /// Merges identifiers from a payload; newer non-empty values win.
    pub fn absorb(&mut self, step: &StepPayload) {
        merge(&mut self.thread_uuid, &step.uuid);
        merge(&mut self.backend_uuid, &step.backend_uuid);
        merge(&mut self.context_uuid, &step.context_uuid);
        merge(&mut self.thread_url_slug, &step.thread_url_slug);
    }
}

fn merge(slot: &mut Option<String>, candidate: &Option<String>) {
    if let Some(value) = candidate {
        if !value.is_empty() {
            *slot = Some(value.clone());
        }
    }
}

/// Caller-facing result of an ask exchange.
///
/// In streaming mode `text` holds only the newly appeared suffix since the
/// previous emission; continuity identifiers are repeated on every emission
/// so a caller may persist them even if it stops early.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AskResult {
    /// Aggregate text (blocking mode) or delta (streaming mode)
    pub text: String,
    /// Ordered citations; populated from the terminal answer
    pub web_results: Vec<Citation>,
    /// Structured answer data, when present
    pub structured_answer: Option<Value>,
    /// Identifiers needed to continue this thread
    pub continuity: ConversationContinuity,
    /// Mode echoed by the server
    pub mode: Option<String>,
    /// Model the server actually used
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_source_from_str() {
        assert_eq!("web".parse::<Source>().unwrap(), Source::Web);
        assert_eq!("scholar".parse::<Source>().unwrap(), Source::Scholar);
        assert_eq!("social".parse::<Source>().unwrap(), Source::Social);

        let err = "images".parse::<Source>().unwrap_err();
        assert!(matches!(
            err,
            PerplexityError::InvalidArgument { ref field, .. } if field == "sources"
        ));
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(serde_json::to_string(&Mode::Concise).unwrap(), "\"concise\"");
        assert_eq!(serde_json::to_string(&Mode::Research).unwrap(), "\"research\"");
    }

    #[test]
    fn test_model_preference_wire_names() {
        assert_eq!(ModelPreference::PplxPro.as_str(), "pplx_pro");
        assert_eq!(ModelPreference::Gpt4o.as_str(), "gpt-4o");
        assert_eq!(
            ModelPreference::Custom("experimental".to_string()).as_str(),
            "experimental"
        );
        assert_eq!(
            serde_json::to_string(&ModelPreference::Gemini20Flash).unwrap(),
            "\"gemini 2.0 flash\""
        );
    }

    #[test]
    fn test_step_payload_ignores_unknown_fields() {
        let step = StepPayload::from_value(json!({
            "step_type": "SEARCH",
            "text": "so far",
            "backend_uuid": "b-1",
            "something_new": {"deep": true}
        }))
        .unwrap();

        assert_eq!(step.step_type.as_deref(), Some("SEARCH"));
        assert_eq!(step.text.as_deref(), Some("so far"));
        assert_eq!(step.backend_uuid.as_deref(), Some("b-1"));
    }

    #[test]
    fn test_step_payload_rejects_non_object() {
        assert!(StepPayload::from_value(json!("just a string")).is_none());
        assert!(StepPayload::from_value(json!(42)).is_none());
    }

    #[test]
    fn test_answer_str() {
        let step = StepPayload::from_value(json!({
            "content": {"answer": "{\"answer\":\"X\"}"}
        }))
        .unwrap();
        assert_eq!(step.answer_str(), Some("{\"answer\":\"X\"}"));

        let no_content = StepPayload::default();
        assert_eq!(no_content.answer_str(), None);
    }

    #[test]
    fn test_continuity_absorb_keeps_latest_non_empty() {
        let mut continuity = ConversationContinuity::default();

        let first = StepPayload {
            backend_uuid: Some("b-1".to_string()),
            uuid: Some("t-1".to_string()),
            ..Default::default()
        };
        continuity.absorb(&first);

        let second = StepPayload {
            backend_uuid: Some("b-2".to_string()),
            uuid: Some("".to_string()),
            ..Default::default()
        };
        continuity.absorb(&second);

        assert_eq!(continuity.backend_uuid.as_deref(), Some("b-2"));
        assert_eq!(continuity.thread_uuid.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_ask_request_serialization_shape() {
        let request = AskRequest {
            query_str: "what is rust".to_string(),
            params: AskParams {
                read_write_token: None,
                is_voice_to_voice: false,
                model_preference: None,
                supported_block_use_cases: default_block_use_cases(),
                query_source: "home".to_string(),
                is_related_query: false,
                frontend_uuid: "f-uuid".to_string(),
                language: "en-US".to_string(),
                timezone: "UTC".to_string(),
                user_nextauth_id: None,
                frontend_context_uuid: "fc-uuid".to_string(),
                sources: vec![Source::Web],
                use_schematized_api: true,
                is_incognito: false,
                last_backend_uuid: None,
                mode: Mode::Concise,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["query_str"], "what is rust");
        assert_eq!(value["params"]["sources"], json!(["web"]));
        assert_eq!(value["params"]["mode"], "concise");
        // Optionals stay off the wire entirely.
        assert!(value["params"].get("model_preference").is_none());
        assert!(value["params"].get("last_backend_uuid").is_none());
        assert!(value["params"].get("read_write_token").is_none());
    }
}
