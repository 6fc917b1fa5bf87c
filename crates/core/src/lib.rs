pub mod analytics;
pub mod catalog;
pub mod config;
pub mod context;
pub mod errors;
pub mod flows;
pub mod i18n;
pub mod intent;
pub mod quote;
pub mod responses;
pub mod sentiment;
pub mod session;
pub mod storage;

pub use analytics::AnalyticsCounters;
pub use catalog::{Catalog, Discount, Product, ProductCategory, ProductId, ProductOption};
pub use context::{ConversationContext, ExtractedField};
pub use errors::{ApplicationError, DomainError};
pub use flows::{
    ConversationEvent, ConversationState, FlowEngine, FlowTransitionError, OrderStep, TurnAction,
};
pub use i18n::Language;
pub use intent::{IntentCategory, KeywordMatcher, MatchedIntent};
pub use quote::{OrderData, OrderRecord, Quote, QuotePricing};
pub use responses::{BotReply, ResponseRenderer};
pub use sentiment::{Sentiment, SentimentAnalyzer, SentimentReport};
pub use session::{ChatSession, ChatTurn, Role, SessionSnapshot};
pub use storage::{InMemoryStore, JsonFileStore, LocalStore, StoreError};
