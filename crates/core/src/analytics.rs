use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::intent::IntentCategory;
use crate::sentiment::Sentiment;
use crate::storage::{self, keys, LocalStore, StoreError};

/// Session analytics accumulated across the widget's lifetime and persisted
/// under a single store key. Counters only; no message content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsCounters {
    pub sessions_started: u64,
    pub messages_received: u64,
    pub quotes_started: u64,
    pub orders_completed: u64,
    pub ai_fallbacks: u64,
    pub urgent_messages: u64,
    pub intents: BTreeMap<String, u64>,
    pub sentiments: BTreeMap<String, u64>,
}

impl AnalyticsCounters {
    pub fn load(store: &dyn LocalStore) -> Result<AnalyticsCounters, StoreError> {
        Ok(storage::load(store, keys::ANALYTICS)?.unwrap_or_default())
    }

    pub fn save(&self, store: &dyn LocalStore) -> Result<(), StoreError> {
        storage::save(store, keys::ANALYTICS, self)
    }

    pub fn record_session(&mut self) {
        self.sessions_started += 1;
    }

    pub fn record_message(&mut self, intent: IntentCategory, sentiment: Sentiment, urgent: bool) {
        self.messages_received += 1;
        *self.intents.entry(intent_key(intent).to_string()).or_default() += 1;
        *self.sentiments.entry(sentiment_key(sentiment).to_string()).or_default() += 1;
        if urgent {
            self.urgent_messages += 1;
        }
    }

    pub fn record_quote_started(&mut self) {
        self.quotes_started += 1;
    }

    pub fn record_order_completed(&mut self) {
        self.orders_completed += 1;
    }

    pub fn record_ai_fallback(&mut self) {
        self.ai_fallbacks += 1;
    }
}

fn intent_key(intent: IntentCategory) -> &'static str {
    match intent {
        IntentCategory::Order => "order",
        IntentCategory::Confirm => "confirm",
        IntentCategory::Cancel => "cancel",
        IntentCategory::PriceInquiry => "price_inquiry",
        IntentCategory::Website => "website",
        IntentCategory::App => "app",
        IntentCategory::AiSolution => "ai_solution",
        IntentCategory::Design => "design",
        IntentCategory::ServiceOverview => "service_overview",
        IntentCategory::Portfolio => "portfolio",
        IntentCategory::Contact => "contact",
        IntentCategory::Greeting => "greeting",
        IntentCategory::Thanks => "thanks",
        IntentCategory::Fallback => "fallback",
    }
}

fn sentiment_key(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive",
        Sentiment::Neutral => "neutral",
        Sentiment::Negative => "negative",
    }
}

#[cfg(test)]
mod tests {
    use crate::intent::IntentCategory;
    use crate::sentiment::Sentiment;
    use crate::storage::InMemoryStore;

    use super::AnalyticsCounters;

    #[test]
    fn counters_accumulate_and_round_trip_through_the_store() {
        let store = InMemoryStore::new();
        let mut counters = AnalyticsCounters::load(&store).expect("load empty");

        counters.record_session();
        counters.record_message(IntentCategory::Greeting, Sentiment::Positive, false);
        counters.record_message(IntentCategory::PriceInquiry, Sentiment::Neutral, true);
        counters.record_quote_started();
        counters.save(&store).expect("save");

        let reloaded = AnalyticsCounters::load(&store).expect("reload");
        assert_eq!(reloaded.messages_received, 2);
        assert_eq!(reloaded.urgent_messages, 1);
        assert_eq!(reloaded.intents.get("greeting"), Some(&1));
        assert_eq!(reloaded.sentiments.get("neutral"), Some(&1));
        assert_eq!(reloaded.quotes_started, 1);
    }
}
