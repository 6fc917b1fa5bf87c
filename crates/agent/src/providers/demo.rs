use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use chatty_core::i18n::Language;
use chatty_core::intent::KeywordMatcher;
use chatty_core::responses::ResponseRenderer;

use crate::provider::{ChatProvider, CompletionRequest, ProviderError};

const PROVIDER: &str = "demo";

/// In-process provider for running without any remote API: answers from the
/// same keyword rules and templates as the core engine. Variant choice is
/// seeded per call, so the same input always gets the same wording.
pub struct DemoProvider {
    language: Language,
    matcher: KeywordMatcher,
    renderer: ResponseRenderer,
}

impl DemoProvider {
    pub fn new(language: Language) -> Self {
        Self { language, matcher: KeywordMatcher::new(), renderer: ResponseRenderer::new() }
    }
}

#[async_trait]
impl ChatProvider for DemoProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let text = request
            .last_user_message()
            .ok_or(ProviderError::UnexpectedPayload { provider: PROVIDER })?;

        let matched = self.matcher.match_intent(text, self.language);
        let mut rng = StdRng::seed_from_u64(0);
        let reply = self.renderer.for_intent(matched.category, self.language, &mut rng);
        Ok(reply.text)
    }
}
