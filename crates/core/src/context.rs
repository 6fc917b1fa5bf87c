use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductCategory;
use crate::intent::IntentCategory;
use crate::sentiment::SentimentReport;

/// Which best-effort fields a single observation pulled out of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedField {
    Name,
    Email,
    Phone,
    Budget,
}

/// Best-effort knowledge accumulated over a whole session. Extraction is
/// heuristic: later matches overwrite earlier ones and nothing here is
/// authoritative. The order flow collects its own validated fields; this
/// struct only informs rendering and analytics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub budget: Option<Decimal>,
    pub interested_categories: BTreeSet<String>,
    pub last_intent: Option<IntentCategory>,
    pub last_sentiment: Option<SentimentReport>,
}

impl ConversationContext {
    /// Folds one user turn into the context, returning what was extracted.
    pub fn observe(
        &mut self,
        text: &str,
        intent: IntentCategory,
        sentiment: &SentimentReport,
    ) -> Vec<ExtractedField> {
        let mut extracted = Vec::new();

        if let Some(email) = extract_email(text) {
            self.email = Some(email);
            extracted.push(ExtractedField::Email);
        }
        if let Some(phone) = extract_phone(text) {
            self.phone = Some(phone);
            extracted.push(ExtractedField::Phone);
        }
        if let Some(budget) = extract_budget(text) {
            self.budget = Some(budget);
            extracted.push(ExtractedField::Budget);
        }
        // Name detection is the weakest heuristic; only attempt it when the
        // message carries nothing else.
        if extracted.is_empty() && intent == IntentCategory::Fallback {
            if let Some(name) = extract_name(text) {
                self.name = Some(name);
                extracted.push(ExtractedField::Name);
            }
        }

        if let Some(category) = interested_category(intent) {
            self.interested_categories.insert(category_key(category).to_string());
        }
        self.last_intent = Some(intent);
        self.last_sentiment = Some(sentiment.clone());

        extracted
    }
}

fn interested_category(intent: IntentCategory) -> Option<ProductCategory> {
    match intent {
        IntentCategory::Website => Some(ProductCategory::Website),
        IntentCategory::App => Some(ProductCategory::App),
        IntentCategory::AiSolution => Some(ProductCategory::Ai),
        IntentCategory::Design => Some(ProductCategory::Design),
        _ => None,
    }
}

fn category_key(category: ProductCategory) -> &'static str {
    match category {
        ProductCategory::Website => "website",
        ProductCategory::App => "app",
        ProductCategory::Ai => "ai",
        ProductCategory::Design => "design",
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '<' | '>')))
        .find(|token| {
            let Some((local, domain)) = token.split_once('@') else { return false };
            !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
        })
        .map(|token| token.to_string())
}

/// A run of digits, separators allowed, with at least 9 digits total.
pub fn extract_phone(text: &str) -> Option<String> {
    let mut current = String::new();
    let mut digits = 0usize;
    let mut best: Option<(String, usize)> = None;

    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() {
            current.push(ch);
            digits += 1;
        } else if matches!(ch, '-' | ' ' | '.') && !current.is_empty() && ch != ' ' {
            current.push(ch);
        } else {
            if digits >= 9 && best.as_ref().map(|(_, n)| digits > *n).unwrap_or(true) {
                best = Some((current.trim_matches('-').to_string(), digits));
            }
            current.clear();
            digits = 0;
        }
    }

    best.map(|(number, _)| number)
}

/// Money amounts: `$50k`, `300만원`, `3000000원`, `$2,500`.
pub fn extract_budget(text: &str) -> Option<Decimal> {
    let lowered = text.to_lowercase();
    for raw in lowered.split_whitespace() {
        let token = raw.trim_matches(|c: char| matches!(c, ',' | '.' | '!' | '?' | ')' | '('));
        if let Some(amount) = parse_money_token(token) {
            return Some(amount);
        }
    }
    None
}

fn parse_money_token(token: &str) -> Option<Decimal> {
    let (body, currency_marked) = if let Some(stripped) = token.strip_prefix('$') {
        (stripped, true)
    } else if let Some(stripped) = token.strip_suffix("만원") {
        return parse_amount(stripped).map(|amount| amount * Decimal::new(10_000, 0));
    } else if let Some(stripped) = token.strip_suffix('원') {
        (stripped, true)
    } else {
        (token, false)
    };

    if !currency_marked {
        return None;
    }

    let (digits, multiplier) = if let Some(prefix) = body.strip_suffix('k') {
        (prefix, Decimal::new(1_000, 0))
    } else if let Some(prefix) = body.strip_suffix('m') {
        (prefix, Decimal::new(1_000_000, 0))
    } else {
        (body, Decimal::ONE)
    };

    parse_amount(digits).map(|amount| amount * multiplier)
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok().filter(|amount| *amount > Decimal::ZERO)
}

/// Mirrors the original widget's name guess: one short token, no digits,
/// not an affirmation.
fn extract_name(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let not_affirmation = !matches!(trimmed, "네" | "예" | "아니요" | "yes" | "no" | "ok");
    let shape_ok = !trimmed.is_empty()
        && trimmed.chars().count() < 10
        && !trimmed.contains(' ')
        && !trimmed.chars().any(|c| c.is_ascii_digit());

    (shape_ok && not_affirmation).then(|| trimmed.to_string())
}
