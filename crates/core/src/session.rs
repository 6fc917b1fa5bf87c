use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::AnalyticsCounters;
use crate::catalog::Catalog;
use crate::config::WidgetConfig;
use crate::context::ConversationContext;
use crate::errors::ApplicationError;
use crate::flows::{
    validate_field, ConversationEvent, ConversationState, FlowEngine, OrderStep, TurnAction,
};
use crate::i18n::Language;
use crate::intent::{IntentCategory, KeywordMatcher};
use crate::quote::{order_number, OrderData, OrderRecord, Quote};
use crate::responses::{BotReply, ResponseRenderer};
use crate::sentiment::SentimentAnalyzer;
use crate::storage::{self, keys, LocalStore, ORDERS_CAP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of a session for the server and CLI surfaces.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub language: Language,
    pub state: ConversationState,
    pub history_len: usize,
    pub quote_in_progress: bool,
}

/// One widget session: the explicit object replacing the original's global
/// widget singleton. Owns the state machine, context, quote, order data and
/// bounded history; configuration, catalog, store and RNG are injected, so
/// independent sessions (and tests) do not share state.
pub struct ChatSession<R: Rng = StdRng> {
    id: String,
    language: Language,
    state: ConversationState,
    engine: FlowEngine,
    matcher: KeywordMatcher,
    analyzer: SentimentAnalyzer,
    renderer: ResponseRenderer,
    catalog: Catalog,
    context: ConversationContext,
    quote: Option<Quote>,
    order: OrderData,
    history: Vec<ChatTurn>,
    history_cap: usize,
    analytics: AnalyticsCounters,
    store: Arc<dyn LocalStore>,
    rng: R,
}

impl ChatSession<StdRng> {
    pub fn new(
        catalog: Catalog,
        widget: &WidgetConfig,
        store: Arc<dyn LocalStore>,
    ) -> Result<Self, ApplicationError> {
        Self::with_rng(catalog, widget, store, StdRng::from_entropy())
    }
}

impl<R: Rng> ChatSession<R> {
    pub fn with_rng(
        catalog: Catalog,
        widget: &WidgetConfig,
        store: Arc<dyn LocalStore>,
        rng: R,
    ) -> Result<Self, ApplicationError> {
        let engine = FlowEngine::default();
        let mut analytics = AnalyticsCounters::load(store.as_ref())?;
        analytics.record_session();
        analytics.save(store.as_ref())?;

        Ok(ChatSession {
            id: new_session_id(),
            language: widget.default_language,
            state: engine.initial_state(),
            engine,
            matcher: KeywordMatcher::new(),
            analyzer: SentimentAnalyzer::new(),
            renderer: ResponseRenderer::new(),
            catalog,
            context: ConversationContext::default(),
            quote: None,
            order: OrderData::default(),
            history: Vec::new(),
            history_cap: widget.history_cap,
            analytics,
            store,
            rng,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn analytics(&self) -> &AnalyticsCounters {
        &self.analytics
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            language: self.language,
            state: self.state,
            history_len: self.history.len(),
            quote_in_progress: self.quote.is_some(),
        }
    }

    /// The greeting shown when the widget opens on an empty conversation.
    pub fn welcome(&self) -> BotReply {
        self.renderer.welcome(self.language)
    }

    /// Generic localized apology, shown only when a turn failed outright.
    pub fn apology(&self) -> BotReply {
        self.renderer.apology(self.language)
    }

    /// Handles one user turn through the rule-based engine and returns the
    /// bot's reply. Synchronous; the optional AI path wraps this from the
    /// agent crate and falls back here.
    pub fn handle_message(&mut self, text: &str) -> Result<BotReply, ApplicationError> {
        self.push_turn(Role::User, text)?;

        let reply = match self.state {
            ConversationState::Ordering { step } => self.process_order_step(step, text)?,
            ConversationState::Quoting => self.process_quote_step(text)?,
            ConversationState::Idle => self.process_idle(text)?,
        };

        self.push_turn(Role::Bot, &reply.text)?;
        self.analytics.save(self.store.as_ref())?;
        Ok(reply)
    }

    /// Clears quote, order data and history, and issues a new session id.
    pub fn reset(&mut self) -> Result<(), ApplicationError> {
        let outcome = self.engine.apply(&self.state, &ConversationEvent::SessionReset)?;
        self.state = outcome.to;
        self.quote = None;
        self.order = OrderData::default();
        self.context = ConversationContext::default();
        self.history.clear();
        self.store.remove(keys::CHAT_HISTORY)?;
        self.id = new_session_id();

        self.analytics.record_session();
        self.analytics.save(self.store.as_ref())?;
        Ok(())
    }

    /// Called by the AI layer when a provider call failed and the rule-based
    /// reply was served instead.
    pub fn note_ai_fallback(&mut self) -> Result<(), ApplicationError> {
        self.analytics.record_ai_fallback();
        self.analytics.save(self.store.as_ref())?;
        Ok(())
    }

    fn process_idle(&mut self, text: &str) -> Result<BotReply, ApplicationError> {
        let matched = self.matcher.match_intent(text, self.language);
        let sentiment = self.analyzer.analyze(text);
        self.context.observe(text, matched.category, &sentiment);
        self.analytics.record_message(matched.category, sentiment.sentiment, sentiment.urgent);

        match matched.category {
            IntentCategory::PriceInquiry => {
                let outcome =
                    self.engine.apply(&self.state, &ConversationEvent::QuoteRequested)?;
                self.state = outcome.to;
                self.quote = Some(Quote { first_order: self.no_saved_orders()?, ..Quote::default() });
                self.analytics.record_quote_started();
                Ok(self.renderer.for_intent(matched.category, self.language, &mut self.rng))
            }
            IntentCategory::Order => {
                let outcome =
                    self.engine.apply(&self.state, &ConversationEvent::OrderRequested)?;
                self.state = outcome.to;
                self.order = OrderData::default();
                Ok(self.renderer.step_prompt(OrderStep::FIRST, self.language))
            }
            category => Ok(self.renderer.for_intent(category, self.language, &mut self.rng)),
        }
    }

    fn process_quote_step(&mut self, text: &str) -> Result<BotReply, ApplicationError> {
        let matched = self.matcher.match_intent(text, self.language);
        let sentiment = self.analyzer.analyze(text);
        self.context.observe(text, matched.category, &sentiment);
        self.analytics.record_message(matched.category, sentiment.sentiment, sentiment.urgent);

        let quote = self.quote.get_or_insert_with(Quote::default);

        if let Some(product) = self.catalog.match_product(text) {
            quote.add_product(product);
            let pricing = quote.price(&self.catalog);
            return self.renderer.quote_ready(&pricing, self.language);
        }

        if !quote.is_empty() {
            if let Some(option) = self.catalog.match_option(text) {
                if quote.add_option(option) {
                    let pricing = quote.price(&self.catalog);
                    return self.renderer.quote_ready(&pricing, self.language);
                }
            }
        }

        match matched.category {
            IntentCategory::Confirm | IntentCategory::Order => {
                let outcome =
                    self.engine.apply(&self.state, &ConversationEvent::QuoteConfirmed)?;
                self.state = outcome.to;
                self.order = OrderData::default();
                Ok(self.renderer.step_prompt(OrderStep::FIRST, self.language))
            }
            IntentCategory::Cancel => {
                let outcome =
                    self.engine.apply(&self.state, &ConversationEvent::QuoteCancelled)?;
                self.state = outcome.to;
                self.quote = None;
                Ok(self.renderer.quote_cancelled(self.language))
            }
            _ => Ok(self.renderer.pick_service(self.language)),
        }
    }

    fn process_order_step(
        &mut self,
        step: OrderStep,
        text: &str,
    ) -> Result<BotReply, ApplicationError> {
        if !validate_field(step, text) {
            // re-prompt the same step, no state advance
            return Ok(self.renderer.step_error(step, self.language));
        }

        let value = text.trim().to_string();
        match step {
            OrderStep::Name => self.order.name = Some(value),
            OrderStep::Email => self.order.email = Some(value),
            OrderStep::Phone => self.order.phone = Some(value),
            OrderStep::Details => self.order.details = Some(value),
        }

        let outcome = self.engine.apply(&self.state, &ConversationEvent::FieldAccepted(step))?;
        self.state = outcome.to;

        for action in &outcome.actions {
            match action {
                TurnAction::PromptStep(next) => {
                    return Ok(self.renderer.step_prompt(*next, self.language));
                }
                TurnAction::ConfirmOrder => return self.confirm_order(),
                _ => {}
            }
        }

        // transition table guarantees one of the two actions above
        Err(ApplicationError::Domain(crate::errors::DomainError::InvariantViolation(
            "order step transition produced no prompt or confirmation".to_string(),
        )))
    }

    fn confirm_order(&mut self) -> Result<BotReply, ApplicationError> {
        if !self.order.is_complete() {
            return Err(ApplicationError::Domain(crate::errors::DomainError::InvariantViolation(
                "order confirmation reached with missing fields".to_string(),
            )));
        }

        let now = Utc::now();
        let quote_total =
            self.quote.as_ref().map(|quote| quote.price(&self.catalog).total);
        let record = OrderRecord {
            order_number: order_number(now),
            name: self.order.name.clone().unwrap_or_default(),
            email: self.order.email.clone().unwrap_or_default(),
            phone: self.order.phone.clone().unwrap_or_default(),
            details: self.order.details.clone().unwrap_or_default(),
            quote_total,
            created_at: now,
        };

        storage::push_capped(self.store.as_ref(), keys::ORDERS, record.clone(), ORDERS_CAP)?;
        self.analytics.record_order_completed();

        self.quote = None;
        self.order = OrderData::default();

        self.renderer.order_confirmed(&record, self.language)
    }

    fn push_turn(&mut self, role: Role, text: &str) -> Result<(), ApplicationError> {
        let turn = ChatTurn { role, text: text.to_string(), timestamp: Utc::now() };
        self.history.push(turn.clone());
        if self.history.len() > self.history_cap {
            let excess = self.history.len() - self.history_cap;
            self.history.drain(..excess);
        }
        storage::push_capped(self.store.as_ref(), keys::CHAT_HISTORY, turn, self.history_cap)?;
        Ok(())
    }

    fn no_saved_orders(&self) -> Result<bool, ApplicationError> {
        let orders: Option<Vec<OrderRecord>> =
            storage::load(self.store.as_ref(), keys::ORDERS)?;
        Ok(orders.map(|orders| orders.is_empty()).unwrap_or(true))
    }
}

fn new_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::catalog::Catalog;
    use crate::config::WidgetConfig;
    use crate::flows::{ConversationState, OrderStep};
    use crate::i18n::Language;
    use crate::quote::OrderRecord;
    use crate::storage::{keys, load, InMemoryStore};

    use super::{ChatSession, ChatTurn};

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
            StdRng::seed_from_u64(42),
        )
        .expect("session")
    }

    #[test]
    fn greeting_leaves_state_idle_with_greeting_quick_replies() {
        let mut session = session();
        let reply = session.handle_message("안녕").expect("reply");

        assert_eq!(session.state(), ConversationState::Idle);
        let pack = crate::i18n::pack(Language::Ko);
        assert!(pack.greeting.contains(&reply.text.as_str()));
        assert_eq!(
            reply.quick_replies,
            pack.quick.welcome.iter().map(|r| r.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn price_inquiry_starts_quoting() {
        let mut session = session();
        session.handle_message("견적 문의합니다").expect("reply");
        assert_eq!(session.state(), ConversationState::Quoting);
        assert_eq!(session.analytics().quotes_started, 1);
    }

    #[test]
    fn full_quote_to_order_happy_path() {
        let mut session = session();

        session.handle_message("가격이 궁금해요").expect("starts quoting");
        let card = session.handle_message("쇼핑몰로 할게요").expect("product recognized");
        assert!(card.text.contains("쇼핑몰"));
        assert!(card.text.contains("3000000원"));

        let prompt = session.handle_message("확정할게요").expect("confirmation");
        assert_eq!(
            session.state(),
            ConversationState::Ordering { step: OrderStep::Name }
        );
        assert!(prompt.text.contains("성함"));

        session.handle_message("김민준").expect("name");
        session.handle_message("kim@example.com").expect("email");
        session.handle_message("010-1234-5678").expect("phone");
        let confirmation = session.handle_message("쇼핑몰 제작 부탁드립니다").expect("details");

        assert_eq!(session.state(), ConversationState::Idle);
        assert!(confirmation.text.contains("주문이 접수되었습니다"));
        assert!(confirmation.text.contains("ORD"));
        assert_eq!(session.analytics().orders_completed, 1);
    }

    #[test]
    fn invalid_email_reprompts_without_advancing() {
        let mut session = session();
        session.handle_message("주문하고 싶어요").expect("starts ordering");
        session.handle_message("김민준").expect("name accepted");
        assert_eq!(
            session.state(),
            ConversationState::Ordering { step: OrderStep::Email }
        );

        let reply = session.handle_message("not-an-email").expect("error reply");
        assert_eq!(
            session.state(),
            ConversationState::Ordering { step: OrderStep::Email }
        );
        assert!(reply.text.contains("이메일"));
    }

    #[test]
    fn cancel_during_quoting_returns_to_idle_and_discards_quote() {
        let mut session = session();
        session.handle_message("견적이요").expect("starts quoting");
        session.handle_message("쇼핑몰").expect("adds product");

        let reply = session.handle_message("취소할게요").expect("cancel");
        assert_eq!(session.state(), ConversationState::Idle);
        assert!(reply.text.contains("취소했습니다"));
        assert!(!session.snapshot().quote_in_progress);
    }

    #[test]
    fn unrecognized_quoting_input_prompts_service_choice() {
        let mut session = session();
        session.handle_message("견적 주세요").expect("starts quoting");
        let reply = session.handle_message("음...").expect("unrecognized");
        assert_eq!(session.state(), ConversationState::Quoting);
        assert!(reply.text.contains("어떤 서비스"));
    }

    #[test]
    fn reset_clears_everything_and_issues_a_new_id() {
        let mut session = session();
        let original_id = session.id().to_string();

        session.handle_message("견적이요").expect("quoting");
        session.handle_message("쇼핑몰").expect("product");
        session.reset().expect("reset");

        assert_ne!(session.id(), original_id);
        assert_eq!(session.state(), ConversationState::Idle);
        assert!(session.history().is_empty());
        assert!(!session.snapshot().quote_in_progress);

        let history: Option<Vec<ChatTurn>> =
            load(session.store.as_ref(), keys::CHAT_HISTORY).expect("history read");
        assert!(history.is_none());
    }

    #[test]
    fn confirmed_orders_are_persisted_with_quote_totals() {
        let store = Arc::new(InMemoryStore::new());
        let mut session = ChatSession::with_rng(
            Catalog::builtin(),
            &widget(),
            store.clone(),
            StdRng::seed_from_u64(7),
        )
        .expect("session");

        session.handle_message("견적 문의").expect("quoting");
        session.handle_message("AI 챗봇이요").expect("product");
        session.handle_message("진행해주세요").expect("confirm");
        session.handle_message("이서연").expect("name");
        session.handle_message("seo@example.com").expect("email");
        session.handle_message("010-9876-5432").expect("phone");
        session.handle_message("상담 챗봇 구축").expect("details");

        let orders: Vec<OrderRecord> =
            load(store.as_ref(), keys::ORDERS).expect("orders read").expect("orders present");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].email, "seo@example.com");
        assert!(orders[0].quote_total.is_some());
    }

    #[test]
    fn history_is_capped_at_the_configured_bound() {
        let mut config = widget();
        config.history_cap = 6;
        let mut session = ChatSession::with_rng(
            Catalog::builtin(),
            &config,
            Arc::new(InMemoryStore::new()),
            StdRng::seed_from_u64(1),
        )
        .expect("session");

        for _ in 0..10 {
            session.handle_message("안녕하세요").expect("reply");
        }
        assert_eq!(session.history().len(), 6);
    }

    #[test]
    fn english_session_replies_in_english() {
        let mut config = widget();
        config.default_language = Language::En;
        let mut session = ChatSession::with_rng(
            Catalog::builtin(),
            &config,
            Arc::new(InMemoryStore::new()),
            StdRng::seed_from_u64(3),
        )
        .expect("session");

        let reply = session.handle_message("how much is a website?").expect("reply");
        assert!(reply.text.contains("quote inquiry"));
        assert_eq!(session.state(), ConversationState::Quoting);
    }
}
