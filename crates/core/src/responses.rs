use rand::Rng;
use serde::Serialize;
use tera::Tera;

use crate::errors::ApplicationError;
use crate::flows::OrderStep;
use crate::i18n::{pack, Language, LocalePack};
use crate::intent::IntentCategory;
use crate::quote::{OrderRecord, QuotePricing};

/// A rendered bot turn: the message text plus the quick-reply buttons to
/// offer underneath it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BotReply {
    pub text: String,
    pub quick_replies: Vec<String>,
}

impl BotReply {
    fn new(text: impl Into<String>, quick_replies: &[&str]) -> Self {
        BotReply {
            text: text.into(),
            quick_replies: quick_replies.iter().map(|reply| reply.to_string()).collect(),
        }
    }
}

const QUOTE_CARD: &str = "\
{{ title }}
{% for line in lines %}- {{ line.label }}: {{ line.amount }}{{ currency }}
{% endfor %}\
{% for line in discounts %}- {{ line.label }}: -{{ line.amount }}{{ currency }}
{% endfor %}\
{{ total_label }}: {{ total }}{{ currency }}";

const ORDER_CARD: &str = "\
{{ title }}
- {{ number_label }}: {{ order_number }}
- {{ name_label }}: {{ name }}
- {{ email_label }}: {{ email }}
- {{ phone_label }}: {{ phone }}\
{% if amount %}
- {{ amount_label }}: {{ amount }}{{ currency }}{% endif %}";

/// Maps (state, matched category or order step, language) to literal
/// template text and quick replies. Equivalent variants are chosen through
/// the caller's RNG so tests can seed it.
#[derive(Clone, Debug, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn welcome(&self, language: Language) -> BotReply {
        let pack = pack(language);
        BotReply::new(pack.welcome, pack.quick.welcome)
    }

    pub fn apology(&self, language: Language) -> BotReply {
        let pack = pack(language);
        BotReply::new(pack.apology, pack.quick.fallback)
    }

    /// Idle-state reply for a matched category.
    pub fn for_intent<R: Rng>(
        &self,
        category: IntentCategory,
        language: Language,
        rng: &mut R,
    ) -> BotReply {
        let pack = pack(language);
        match category {
            IntentCategory::Greeting => BotReply::new(choose(rng, pack.greeting), pack.quick.welcome),
            IntentCategory::ServiceOverview => {
                BotReply::new(pack.service_overview, pack.quick.services)
            }
            IntentCategory::Website => BotReply::new(pack.website, pack.quick.fallback),
            IntentCategory::App => BotReply::new(pack.app, pack.quick.fallback),
            IntentCategory::AiSolution => BotReply::new(pack.ai_solution, pack.quick.fallback),
            IntentCategory::Design => BotReply::new(pack.design, pack.quick.fallback),
            IntentCategory::PriceInquiry => {
                BotReply::new(pack.price_inquiry, pack.quick.services)
            }
            IntentCategory::Portfolio => BotReply::new(pack.portfolio, pack.quick.fallback),
            IntentCategory::Contact => BotReply::new(pack.contact, pack.quick.fallback),
            IntentCategory::Thanks => BotReply::new(choose(rng, pack.thanks), pack.quick.fallback),
            // order/confirm/cancel are state-machine concerns; outside their
            // states they read as ordinary fallback chatter
            IntentCategory::Order
            | IntentCategory::Confirm
            | IntentCategory::Cancel
            | IntentCategory::Fallback => {
                BotReply::new(choose(rng, pack.fallback), pack.quick.fallback)
            }
        }
    }

    /// Quoting-state prompt when no product was recognized in the message.
    pub fn pick_service(&self, language: Language) -> BotReply {
        let pack = pack(language);
        BotReply::new(pack.quote_pick_service, pack.quick.services)
    }

    pub fn quote_cancelled(&self, language: Language) -> BotReply {
        let pack = pack(language);
        BotReply::new(pack.quote_cancelled, pack.quick.after_cancel)
    }

    /// Header line plus the tera-rendered quote card.
    pub fn quote_ready(
        &self,
        pricing: &QuotePricing,
        language: Language,
    ) -> Result<BotReply, ApplicationError> {
        let pack = pack(language);
        let card = render_quote_card(pricing, pack)?;
        Ok(BotReply::new(format!("{}\n{card}", pack.quote_ready), pack.quick.quoting))
    }

    pub fn step_prompt(&self, step: OrderStep, language: Language) -> BotReply {
        BotReply::new(step_strings(step, language).prompt, &[])
    }

    pub fn step_error(&self, step: OrderStep, language: Language) -> BotReply {
        BotReply::new(step_strings(step, language).error, &[])
    }

    pub fn order_confirmed(
        &self,
        record: &OrderRecord,
        language: Language,
    ) -> Result<BotReply, ApplicationError> {
        let pack = pack(language);
        let card = render_order_card(record, pack)?;
        Ok(BotReply::new(
            format!("{}\n{card}", pack.order_confirmed),
            pack.quick.after_order,
        ))
    }
}

fn step_strings(step: OrderStep, language: Language) -> crate::i18n::StepStrings {
    let pack = pack(language);
    match step {
        OrderStep::Name => pack.collect_name,
        OrderStep::Email => pack.collect_email,
        OrderStep::Phone => pack.collect_phone,
        OrderStep::Details => pack.collect_details,
    }
}

fn choose<'a, R: Rng>(rng: &mut R, variants: &'a [&'a str]) -> &'a str {
    if variants.len() <= 1 {
        return variants.first().copied().unwrap_or_default();
    }
    variants[rng.gen_range(0..variants.len())]
}

fn render_quote_card(
    pricing: &QuotePricing,
    pack: &LocalePack,
) -> Result<String, ApplicationError> {
    let mut context = tera::Context::new();
    context.insert("title", pack.card.quote_title);
    context.insert("total_label", pack.card.total);
    context.insert("currency", pack.card.currency_suffix);
    context.insert("lines", &pricing.lines);
    context.insert("discounts", &pricing.discounts);
    context.insert("total", &pricing.total);

    Tera::one_off(QUOTE_CARD, &context, false)
        .map_err(|error| ApplicationError::Render(error.to_string()))
}

fn render_order_card(
    record: &OrderRecord,
    pack: &LocalePack,
) -> Result<String, ApplicationError> {
    let mut context = tera::Context::new();
    context.insert("title", pack.card.order_title);
    context.insert("number_label", pack.card.order_number);
    context.insert("name_label", pack.card.name);
    context.insert("email_label", pack.card.email);
    context.insert("phone_label", pack.card.phone);
    context.insert("amount_label", pack.card.amount);
    context.insert("currency", pack.card.currency_suffix);
    context.insert("order_number", &record.order_number);
    context.insert("name", &record.name);
    context.insert("email", &record.email);
    context.insert("phone", &record.phone);
    context.insert("amount", &record.quote_total);

    Tera::one_off(ORDER_CARD, &context, false)
        .map_err(|error| ApplicationError::Render(error.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use crate::catalog::Catalog;
    use crate::flows::OrderStep;
    use crate::i18n::Language;
    use crate::intent::IntentCategory;
    use crate::quote::{OrderRecord, Quote};

    use super::ResponseRenderer;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn greeting_reply_comes_from_the_greeting_set() {
        let renderer = ResponseRenderer::new();
        let mut rng = seeded();
        let reply = renderer.for_intent(IntentCategory::Greeting, Language::Ko, &mut rng);

        let pack = crate::i18n::pack(Language::Ko);
        assert!(pack.greeting.contains(&reply.text.as_str()));
        assert_eq!(reply.quick_replies.len(), pack.quick.welcome.len());
    }

    #[test]
    fn seeded_rng_makes_variant_choice_reproducible() {
        let renderer = ResponseRenderer::new();
        let first = renderer.for_intent(IntentCategory::Greeting, Language::Ko, &mut seeded());
        let second = renderer.for_intent(IntentCategory::Greeting, Language::Ko, &mut seeded());
        assert_eq!(first, second);
    }

    #[test]
    fn quote_card_lists_lines_discounts_and_total() {
        let catalog = Catalog::builtin();
        let mut quote = Quote::default();
        quote.add_product(catalog.match_product("web-basic").expect("basic"));
        quote.add_product(catalog.match_product("ai-chatbot").expect("chatbot"));

        let renderer = ResponseRenderer::new();
        let reply = renderer
            .quote_ready(&quote.price(&catalog), Language::Ko)
            .expect("card renders");

        assert!(reply.text.contains("견적서"));
        assert!(reply.text.contains("웹사이트 기본형"));
        assert!(reply.text.contains("패키지 할인"));
        assert!(reply.text.contains("1350000원"));
        assert!(reply.quick_replies.iter().any(|r| r.contains("확정")));
    }

    #[test]
    fn order_card_renders_without_quote_amount() {
        let record = OrderRecord {
            order_number: "ORDTEST1".to_string(),
            name: "김민준".to_string(),
            email: "kim@example.com".to_string(),
            phone: "010-1234-5678".to_string(),
            details: "쇼핑몰 제작".to_string(),
            quote_total: None,
            created_at: Utc::now(),
        };

        let renderer = ResponseRenderer::new();
        let reply = renderer.order_confirmed(&record, Language::Ko).expect("card renders");
        assert!(reply.text.contains("ORDTEST1"));
        assert!(!reply.text.contains("견적 금액"));
    }

    #[test]
    fn order_card_includes_quote_amount_when_present() {
        let record = OrderRecord {
            order_number: "ORDTEST2".to_string(),
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            phone: "010-1234-5678".to_string(),
            details: "web".to_string(),
            quote_total: Some(Decimal::new(500_000, 0)),
            created_at: Utc::now(),
        };

        let renderer = ResponseRenderer::new();
        let reply = renderer.order_confirmed(&record, Language::En).expect("card renders");
        assert!(reply.text.contains("Quoted amount"));
        assert!(reply.text.contains("500000"));
    }

    #[test]
    fn step_prompts_are_localized_with_default_fallback_semantics() {
        let renderer = ResponseRenderer::new();
        let ko = renderer.step_prompt(OrderStep::Email, Language::Ko);
        let en = renderer.step_prompt(OrderStep::Email, Language::En);
        assert_ne!(ko.text, en.text);
        assert!(renderer.step_error(OrderStep::Email, Language::En).text.contains("valid email"));
    }
}
