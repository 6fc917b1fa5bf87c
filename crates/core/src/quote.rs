use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DiscountKind, OptionPrice, Product, ProductOption};

/// An in-progress priced selection of products and options, built up while
/// the session is in the quoting state and discarded on cancel or carried
/// into the order on confirmation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub products: Vec<Product>,
    pub options: Vec<ProductOption>,
    /// Set when the session context saw a first-order hint; advisory only.
    pub first_order: bool,
}

/// One priced row of a rendered quote card.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteLine {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuotePricing {
    pub lines: Vec<QuoteLine>,
    pub discounts: Vec<QuoteLine>,
    pub total: Decimal,
}

impl Quote {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.options.is_empty()
    }

    /// Adds a product once; repeating a product mention does not double it.
    pub fn add_product(&mut self, product: &Product) -> bool {
        if self.products.iter().any(|existing| existing.id == product.id) {
            return false;
        }
        self.products.push(product.clone());
        true
    }

    /// Adds an option when it applies to at least one selected product.
    pub fn add_option(&mut self, option: &ProductOption) -> bool {
        let applicable = self.products.iter().any(|product| option.applies_to(&product.id));
        if !applicable || self.options.iter().any(|existing| existing.id == option.id) {
            return false;
        }
        self.options.push(option.clone());
        true
    }

    fn subtotal(&self) -> Decimal {
        self.products.iter().map(|product| product.base_price).sum()
    }

    /// Prices the quote: product lines, option lines (percentage options are
    /// taken over the product subtotal), then applicable discounts.
    pub fn price(&self, catalog: &Catalog) -> QuotePricing {
        let subtotal = self.subtotal();
        let mut lines: Vec<QuoteLine> = self
            .products
            .iter()
            .map(|product| QuoteLine { label: product.name.clone(), amount: product.base_price })
            .collect();

        for option in &self.options {
            let amount = match &option.price {
                OptionPrice::Fixed(price) => *price,
                OptionPrice::SubtotalPct(rate) => (subtotal * rate).round_dp(0),
            };
            lines.push(QuoteLine { label: option.name.clone(), amount });
        }

        let gross: Decimal = lines.iter().map(|line| line.amount).sum();
        let mut discounts = Vec::new();

        if self.products.len() >= 2 {
            if let Some(bundle) = catalog.discount(DiscountKind::Bundle) {
                discounts.push(QuoteLine {
                    label: bundle.name.clone(),
                    amount: (gross * bundle.rate).round_dp(0),
                });
            }
        }
        if self.first_order {
            if let Some(first) = catalog.discount(DiscountKind::FirstOrder) {
                discounts.push(QuoteLine {
                    label: first.name.clone(),
                    amount: (gross * first.rate).round_dp(0),
                });
            }
        }

        let discount_total: Decimal = discounts.iter().map(|line| line.amount).sum();
        QuotePricing { lines, discounts, total: gross - discount_total }
    }
}

/// Customer fields collected step by step while ordering. Cleared after the
/// order is confirmed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub details: Option<String>,
}

impl OrderData {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some() && self.phone.is_some() && self.details.is_some()
    }
}

/// A confirmed order as persisted to the local store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub details: String,
    pub quote_total: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// `ORD` plus the confirmation timestamp in base 36, uppercased.
pub fn order_number(at: DateTime<Utc>) -> String {
    let mut millis = at.timestamp_millis().unsigned_abs();
    let mut digits = Vec::new();
    loop {
        let digit = (millis % 36) as u32;
        digits.push(char::from_digit(digit, 36).unwrap_or('0').to_ascii_uppercase());
        millis /= 36;
        if millis == 0 {
            break;
        }
    }
    let encoded: String = digits.into_iter().rev().collect();
    format!("ORD{encoded}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::catalog::Catalog;

    use super::{order_number, Quote};

    fn won(amount: i64) -> Decimal {
        Decimal::new(amount, 0)
    }

    #[test]
    fn single_product_quote_has_no_bundle_discount() {
        let catalog = Catalog::builtin();
        let mut quote = Quote::default();
        quote.add_product(catalog.match_product("web-basic").expect("basic"));

        let pricing = quote.price(&catalog);
        assert_eq!(pricing.lines.len(), 1);
        assert!(pricing.discounts.is_empty());
        assert_eq!(pricing.total, won(500_000));
    }

    #[test]
    fn two_products_trigger_bundle_discount() {
        let catalog = Catalog::builtin();
        let mut quote = Quote::default();
        quote.add_product(catalog.match_product("web-basic").expect("basic"));
        quote.add_product(catalog.match_product("ai-chatbot").expect("chatbot"));

        let pricing = quote.price(&catalog);
        // 1,500,000 gross, 10% bundle discount
        assert_eq!(pricing.discounts.len(), 1);
        assert_eq!(pricing.total, won(1_350_000));
    }

    #[test]
    fn duplicate_products_and_inapplicable_options_are_rejected() {
        let catalog = Catalog::builtin();
        let mut quote = Quote::default();
        let basic = catalog.match_product("web-basic").expect("basic");

        assert!(quote.add_product(basic));
        assert!(!quote.add_product(basic));

        // maintenance applies to web-basic but not to a quote holding only design work
        let mut design_quote = Quote::default();
        design_quote.add_product(catalog.match_product("design-ui").expect("design"));
        let maintenance = catalog.match_option("maintenance").expect("maintenance");
        assert!(!design_quote.add_option(maintenance));
    }

    #[test]
    fn rush_delivery_is_priced_over_product_subtotal() {
        let catalog = Catalog::builtin();
        let mut quote = Quote::default();
        quote.add_product(catalog.match_product("app-hybrid").expect("hybrid"));
        assert!(quote.add_option(catalog.match_option("rush").expect("rush")));

        let pricing = quote.price(&catalog);
        // 3,000,000 + 30% rush surcharge
        assert_eq!(pricing.total, won(3_900_000));
    }

    #[test]
    fn order_numbers_are_prefixed_and_stable_for_a_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).single().expect("timestamp");
        let number = order_number(at);
        assert!(number.starts_with("ORD"));
        assert_eq!(number, order_number(at));
    }
}
