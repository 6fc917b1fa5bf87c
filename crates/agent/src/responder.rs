use rand::Rng;
use tracing::warn;

use chatty_core::catalog::Catalog;
use chatty_core::config::{AiConfig, WidgetConfig};
use chatty_core::errors::ApplicationError;
use chatty_core::flows::ConversationState;
use chatty_core::responses::BotReply;
use chatty_core::session::{ChatSession, ChatTurn, Role};

use crate::provider::{ChatMessage, ChatProvider, ChatRole, CompletionRequest, ProviderError};
use crate::providers::build_provider;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Wraps a session with the configured provider. Free-form idle chatter is
/// phrased by the provider; quote and order flows always come from the rule
/// engine, and any provider failure falls back to the rule-based reply.
pub struct AssistedResponder {
    provider: Box<dyn ChatProvider>,
    system: String,
    model: String,
    max_history: usize,
}

impl AssistedResponder {
    pub fn new(provider: Box<dyn ChatProvider>, system: String, model: String, max_history: usize) -> Self {
        Self { provider, system, model, max_history }
    }

    pub fn from_config(
        ai: &AiConfig,
        widget: &WidgetConfig,
        catalog: &Catalog,
    ) -> Result<Self, ProviderError> {
        let provider = build_provider(ai, widget.default_language)?;
        let system = default_system_instruction(widget, catalog);
        Ok(Self::new(provider, system, ai.model.clone(), ai.max_history))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Handles one user turn. The rule engine runs first (it owns state and
    /// history); the provider is only consulted when the turn both started
    /// and ended idle, i.e. plain conversation.
    pub async fn respond<R: Rng>(
        &self,
        session: &mut ChatSession<R>,
        text: &str,
    ) -> Result<BotReply, ApplicationError> {
        let was_idle = session.state() == ConversationState::Idle;
        let rule_reply = session.handle_message(text)?;
        let still_idle = session.state() == ConversationState::Idle;

        if !(was_idle && still_idle) {
            return Ok(rule_reply);
        }

        let request = CompletionRequest {
            system: self.system.clone(),
            history: recent_history(session.history(), self.max_history),
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        match self.provider.complete(&request).await {
            Ok(ai_text) => {
                Ok(BotReply { text: ai_text, quick_replies: rule_reply.quick_replies })
            }
            Err(error) => {
                warn!(
                    provider = self.provider.name(),
                    error = %error,
                    "ai completion failed, serving rule-based reply"
                );
                session.note_ai_fallback()?;
                Ok(rule_reply)
            }
        }
    }
}

/// Maps the session history to provider messages, keeping only the most
/// recent `max_history` turns and dropping the trailing bot turn (that slot
/// is what the provider is being asked to fill).
fn recent_history(history: &[ChatTurn], max_history: usize) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = history
        .iter()
        .map(|turn| ChatMessage {
            role: match turn.role {
                Role::User => ChatRole::User,
                Role::Bot => ChatRole::Assistant,
            },
            content: turn.text.clone(),
        })
        .collect();

    if messages.last().map(|message| message.role == ChatRole::Assistant).unwrap_or(false) {
        messages.pop();
    }

    if messages.len() > max_history {
        messages.drain(..messages.len() - max_history);
    }
    messages
}

/// The fixed system instruction sent with every completion: company
/// identity, the service price list, and the ground rules.
pub fn default_system_instruction(widget: &WidgetConfig, catalog: &Catalog) -> String {
    let mut instruction = format!(
        "You are {bot}, the customer support assistant for {company}.\n\n[Services]\n",
        bot = widget.bot_name,
        company = widget.company_name,
    );

    for product in &catalog.products {
        instruction.push_str(&format!(
            "- {name}: from {price} KRW, about {days} days ({description})\n",
            name = product.name,
            price = product.base_price,
            days = product.delivery_days,
            description = product.description,
        ));
    }

    instruction.push_str(&format!(
        "\n[Rules]\n\
         1. Answer customer questions helpfully and professionally.\n\
         2. Recommend a suitable service and encourage a consultation.\n\
         3. Never discount below the listed prices.\n\
         4. Never promise technically impossible work or exact delivery dates.\n\
         Always answer in the customer's language (default: {language}).",
        language = widget.default_language.code(),
    ));

    instruction
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use chatty_core::catalog::Catalog;
    use chatty_core::config::WidgetConfig;
    use chatty_core::flows::{ConversationState, OrderStep};
    use chatty_core::i18n::Language;
    use chatty_core::session::ChatSession;
    use chatty_core::storage::InMemoryStore;

    use crate::provider::{ChatProvider, CompletionRequest, ProviderError};

    use super::{default_system_instruction, recent_history, AssistedResponder};

    struct StaticProvider {
        reply: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ChatProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            Err(ProviderError::Api { provider: "failing", message: "boom".to_string() })
        }
    }

    fn widget() -> WidgetConfig {
        WidgetConfig {
            bot_name: "Chatty".to_string(),
            company_name: "MUSE Studio".to_string(),
            default_language: Language::Ko,
            history_cap: 50,
        }
    }

    fn session() -> ChatSession<StdRng> {
        ChatSession::with_rng(
            Catalog::builtin(),
            &widget(),
            Arc::new(InMemoryStore::new()),
            StdRng::seed_from_u64(9),
        )
        .expect("session")
    }

    #[tokio::test]
    async fn idle_chatter_is_phrased_by_the_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let responder = AssistedResponder::new(
            Box::new(StaticProvider { reply: "AI says hello", calls: calls.clone() }),
            "system".to_string(),
            "model".to_string(),
            10,
        );

        let mut session = session();
        let reply = responder.respond(&mut session, "안녕하세요").await.expect("reply");

        assert_eq!(reply.text, "AI says hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // quick replies still come from the rule engine
        assert!(!reply.quick_replies.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_the_rule_reply() {
        let responder = AssistedResponder::new(
            Box::new(FailingProvider),
            "system".to_string(),
            "model".to_string(),
            10,
        );

        let mut session = session();
        let reply = responder.respond(&mut session, "안녕").await.expect("reply");

        let pack = chatty_core::i18n::pack(Language::Ko);
        assert!(pack.greeting.contains(&reply.text.as_str()));
        assert_eq!(session.analytics().ai_fallbacks, 1);
    }

    #[tokio::test]
    async fn flow_turns_never_reach_the_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let responder = AssistedResponder::new(
            Box::new(StaticProvider { reply: "should not appear", calls: calls.clone() }),
            "system".to_string(),
            "model".to_string(),
            10,
        );

        let mut session = session();
        // starts quoting: turn ends outside idle, provider must not run
        let reply = responder.respond(&mut session, "견적 문의합니다").await.expect("reply");
        assert_ne!(reply.text, "should not appear");
        assert_eq!(session.state(), ConversationState::Quoting);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        responder.respond(&mut session, "쇼핑몰").await.expect("product");
        responder.respond(&mut session, "확정").await.expect("confirm");
        assert_eq!(
            session.state(),
            ConversationState::Ordering { step: OrderStep::Name }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn history_sent_to_the_provider_is_truncated_and_ends_on_user() {
        let mut session = session();
        for n in 0..8 {
            session.handle_message(&format!("메시지 {n}")).expect("turn");
        }

        let recent = recent_history(session.history(), 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent.last().map(|m| m.role), Some(crate::provider::ChatRole::User));
    }

    #[test]
    fn system_instruction_names_the_catalog_and_company() {
        let instruction = default_system_instruction(&widget(), &Catalog::builtin());
        assert!(instruction.contains("MUSE Studio"));
        assert!(instruction.contains("쇼핑몰"));
        assert!(instruction.contains("Never discount"));
    }
}
