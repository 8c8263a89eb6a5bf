//! Outbound request construction.

use super::types::{
    default_block_use_cases, AskOptions, AskRequest, AskResult, Mode, ModelPreference, Source,
};
use super::validation::validate_query;
use crate::errors::PerplexityResult;
use uuid::Uuid;

/// Generator for per-request correlation identifiers.
///
/// Injected rather than called globally so sessions stay independent and
/// tests can pin ids deterministically.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh unguessable identifier
    fn generate(&self) -> String;
}

/// Default generator producing random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Builds outbound ask payloads.
pub struct RequestBuilder<G: IdGenerator = UuidGenerator> {
    ids: G,
    language: String,
    timezone: String,
    user_nextauth_id: Option<String>,
}

impl RequestBuilder<UuidGenerator> {
    /// Creates a builder with the default UUID generator.
    pub fn new(
        language: impl Into<String>,
        timezone: impl Into<String>,
        user_nextauth_id: Option<String>,
    ) -> Self {
        Self::with_generator(UuidGenerator, language, timezone, user_nextauth_id)
    }
}

impl<G: IdGenerator> RequestBuilder<G> {
    /// Creates a builder with an explicit id generator.
    pub fn with_generator(
        ids: G,
        language: impl Into<String>,
        timezone: impl Into<String>,
        user_nextauth_id: Option<String>,
    ) -> Self {
        Self {
            ids,
            language: language.into(),
            timezone: timezone.into(),
            user_nextauth_id,
        }
    }

    /// Builds the outbound payload for one ask exchange.
    ///
    /// `prior` links the new request into the prior result's thread via
    /// `last_backend_uuid`; without it the request starts a new thread.
    pub fn build(
        &self,
        query: &str,
        options: &AskOptions,
        prior: Option<&AskResult>,
    ) -> PerplexityResult<AskRequest> {
        validate_query(query)?;

        let sources = if options.sources.is_empty() {
            vec![Source::Web]
        } else {
            options.sources.clone()
        };

        // Explicit override wins; research falls back to the pro model;
        // otherwise the server default applies.
        let model_preference = match (&options.model, options.mode) {
            (Some(model), _) => Some(model.clone()),
            (None, Mode::Research) => Some(ModelPreference::PplxPro),
            (None, _) => None,
        };

        let last_backend_uuid = prior.and_then(|r| r.continuity.backend_uuid.clone());

        Ok(AskRequest {
            query_str: query.to_string(),
            params: super::types::AskParams {
                read_write_token: None,
                is_voice_to_voice: false,
                model_preference,
                supported_block_use_cases: default_block_use_cases(),
                query_source: "home".to_string(),
                is_related_query: false,
                frontend_uuid: self.ids.generate(),
                language: self.language.clone(),
                timezone: self.timezone.clone(),
                user_nextauth_id: self.user_nextauth_id.clone(),
                frontend_context_uuid: self.ids.generate(),
                sources,
                use_schematized_api: true,
                is_incognito: options.incognito,
                last_backend_uuid,
                mode: options.mode,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ask::types::ConversationContinuity;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct SequentialIds(AtomicU32);

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn builder() -> RequestBuilder<UuidGenerator> {
        RequestBuilder::new("en-US", "UTC", None)
    }

    #[test]
    fn test_empty_query_rejected() {
        let result = builder().build("  ", &AskOptions::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_sources_default_to_web() {
        let request = builder()
            .build("q", &AskOptions::default(), None)
            .unwrap();
        assert_eq!(request.params.sources, vec![Source::Web]);
    }

    #[test]
    fn test_research_mode_selects_pro_model() {
        let options = AskOptions {
            mode: Mode::Research,
            ..Default::default()
        };
        let request = builder().build("q", &options, None).unwrap();
        assert_eq!(request.params.model_preference, Some(ModelPreference::PplxPro));
    }

    #[test]
    fn test_concise_mode_sends_no_model() {
        let request = builder()
            .build("q", &AskOptions::default(), None)
            .unwrap();
        assert_eq!(request.params.model_preference, None);
    }

    #[test]
    fn test_explicit_model_wins_over_mode() {
        let options = AskOptions {
            mode: Mode::Research,
            model: Some(ModelPreference::Gpt4o),
            ..Default::default()
        };
        let request = builder().build("q", &options, None).unwrap();
        assert_eq!(request.params.model_preference, Some(ModelPreference::Gpt4o));
    }

    #[test]
    fn test_prior_result_links_thread() {
        let prior = AskResult {
            continuity: ConversationContinuity {
                backend_uuid: Some("B1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let request = builder()
            .build("follow up", &AskOptions::default(), Some(&prior))
            .unwrap();
        assert_eq!(request.params.last_backend_uuid.as_deref(), Some("B1"));

        let fresh = builder()
            .build("new thread", &AskOptions::default(), None)
            .unwrap();
        assert_eq!(fresh.params.last_backend_uuid, None);
    }

    #[test]
    fn test_correlation_ids_are_valid_and_distinct_uuids() {
        let builder = builder();
        let first = builder.build("q", &AskOptions::default(), None).unwrap();
        let second = builder.build("q", &AskOptions::default(), None).unwrap();

        for id in [
            &first.params.frontend_uuid,
            &first.params.frontend_context_uuid,
            &second.params.frontend_uuid,
            &second.params.frontend_context_uuid,
        ] {
            assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {}", id);
        }

        assert_ne!(first.params.frontend_uuid, first.params.frontend_context_uuid);
        assert_ne!(first.params.frontend_uuid, second.params.frontend_uuid);
    }

    #[test]
    fn test_injected_generator_is_used() {
        let builder = RequestBuilder::with_generator(
            SequentialIds(AtomicU32::new(0)),
            "en-US",
            "UTC",
            None,
        );
        let request = builder.build("q", &AskOptions::default(), None).unwrap();
        assert_eq!(request.params.frontend_uuid, "id-0");
        assert_eq!(request.params.frontend_context_uuid, "id-1");
    }
}
