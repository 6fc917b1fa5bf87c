use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Website,
    App,
    Ai,
    Design,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub base_price: Decimal,
    pub description: String,
    pub features: Vec<String>,
    pub delivery_days: u32,
    /// Lowercased substrings that identify this product in free text,
    /// across all supported languages.
    pub aliases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OptionPrice {
    Fixed(Decimal),
    /// Percentage of the quote's product subtotal (rush delivery).
    SubtotalPct(Decimal),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Applicability {
    All,
    Products(Vec<ProductId>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub price: OptionPrice,
    pub applicable: Applicability,
    pub aliases: Vec<String>,
}

impl ProductOption {
    pub fn applies_to(&self, product: &ProductId) -> bool {
        match &self.applicable {
            Applicability::All => true,
            Applicability::Products(ids) => ids.contains(product),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Two or more products on the same quote.
    Bundle,
    FirstOrder,
    Referral,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub kind: DiscountKind,
    pub name: String,
    pub rate: Decimal,
}

/// Read-only reference data for quoting. Sessions hold a shared reference;
/// nothing mutates a catalog after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub options: Vec<ProductOption>,
    pub discounts: Vec<Discount>,
}

impl Catalog {
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn discount(&self, kind: DiscountKind) -> Option<&Discount> {
        self.discounts.iter().find(|discount| discount.kind == kind)
    }

    /// First product whose name or any alias occurs in `text` (case folded).
    pub fn match_product(&self, text: &str) -> Option<&Product> {
        let lowered = text.to_lowercase();
        self.products.iter().find(|product| {
            lowered.contains(&product.name.to_lowercase())
                || lowered.contains(&product.id.0)
                || product.aliases.iter().any(|alias| lowered.contains(alias.as_str()))
        })
    }

    pub fn match_option(&self, text: &str) -> Option<&ProductOption> {
        let lowered = text.to_lowercase();
        self.options.iter().find(|option| {
            lowered.contains(&option.name.to_lowercase())
                || lowered.contains(&option.id)
                || option.aliases.iter().any(|alias| lowered.contains(alias.as_str()))
        })
    }

    /// The service catalog the widget ships with.
    pub fn builtin() -> Catalog {
        fn won(amount: i64) -> Decimal {
            Decimal::new(amount, 0)
        }

        let products = vec![
            Product {
                id: ProductId("web-basic".to_string()),
                name: "웹사이트 기본형".to_string(),
                category: ProductCategory::Website,
                base_price: won(500_000),
                description: "5페이지 이내 반응형 웹사이트".to_string(),
                features: vec![
                    "반응형 디자인".to_string(),
                    "기본 SEO".to_string(),
                    "문의 폼".to_string(),
                    "1개월 무료 유지보수".to_string(),
                ],
                delivery_days: 14,
                aliases: vec!["basic".to_string(), "기본형".to_string()],
            },
            Product {
                id: ProductId("web-professional".to_string()),
                name: "웹사이트 프로페셔널".to_string(),
                category: ProductCategory::Website,
                base_price: won(1_500_000),
                description: "10페이지 이내 고급 웹사이트".to_string(),
                features: vec![
                    "프리미엄 디자인".to_string(),
                    "고급 SEO".to_string(),
                    "관리자 페이지".to_string(),
                    "3개월 무료 유지보수".to_string(),
                ],
                delivery_days: 21,
                aliases: vec!["professional".to_string(), "프로페셔널".to_string()],
            },
            Product {
                id: ProductId("web-shopping".to_string()),
                name: "쇼핑몰".to_string(),
                category: ProductCategory::Website,
                base_price: won(3_000_000),
                description: "결제 시스템 포함 쇼핑몰".to_string(),
                features: vec![
                    "상품 관리".to_string(),
                    "PG 결제 연동".to_string(),
                    "주문 관리".to_string(),
                    "6개월 무료 유지보수".to_string(),
                ],
                delivery_days: 30,
                aliases: vec!["shopping".to_string(), "e-commerce".to_string(), "mall".to_string()],
            },
            Product {
                id: ProductId("app-hybrid".to_string()),
                name: "하이브리드 앱".to_string(),
                category: ProductCategory::App,
                base_price: won(3_000_000),
                description: "iOS/Android 동시 지원 앱".to_string(),
                features: vec![
                    "크로스플랫폼".to_string(),
                    "푸시 알림".to_string(),
                    "3개월 무료 유지보수".to_string(),
                ],
                delivery_days: 45,
                aliases: vec!["hybrid".to_string(), "하이브리드".to_string()],
            },
            Product {
                id: ProductId("app-native".to_string()),
                name: "네이티브 앱".to_string(),
                category: ProductCategory::App,
                base_price: won(5_000_000),
                description: "iOS 또는 Android 네이티브 앱".to_string(),
                features: vec![
                    "최적화 성능".to_string(),
                    "네이티브 UI".to_string(),
                    "6개월 무료 유지보수".to_string(),
                ],
                delivery_days: 60,
                aliases: vec!["native".to_string(), "네이티브".to_string()],
            },
            Product {
                id: ProductId("ai-chatbot".to_string()),
                name: "AI 챗봇".to_string(),
                category: ProductCategory::Ai,
                base_price: won(1_000_000),
                description: "고객응대 AI 챗봇".to_string(),
                features: vec![
                    "24/7 자동 응대".to_string(),
                    "학습 기능".to_string(),
                    "다국어 지원".to_string(),
                ],
                delivery_days: 14,
                aliases: vec!["chatbot".to_string(), "챗봇".to_string()],
            },
            Product {
                id: ProductId("ai-automation".to_string()),
                name: "업무 자동화".to_string(),
                category: ProductCategory::Ai,
                base_price: won(2_000_000),
                description: "AI 기반 업무 자동화".to_string(),
                features: vec![
                    "프로세스 자동화".to_string(),
                    "데이터 처리".to_string(),
                    "API 연동".to_string(),
                ],
                delivery_days: 30,
                aliases: vec!["automation".to_string(), "자동화".to_string()],
            },
            Product {
                id: ProductId("design-ui".to_string()),
                name: "UI/UX 디자인".to_string(),
                category: ProductCategory::Design,
                base_price: won(500_000),
                description: "웹/앱 UI/UX 디자인".to_string(),
                features: vec![
                    "사용자 리서치".to_string(),
                    "와이어프레임".to_string(),
                    "프로토타입".to_string(),
                ],
                delivery_days: 14,
                aliases: vec!["ui/ux".to_string(), "ui design".to_string(), "ux design".to_string()],
            },
            Product {
                id: ProductId("design-branding".to_string()),
                name: "브랜딩".to_string(),
                category: ProductCategory::Design,
                base_price: won(1_000_000),
                description: "로고 및 브랜드 아이덴티티".to_string(),
                features: vec![
                    "로고 디자인".to_string(),
                    "컬러 시스템".to_string(),
                    "브랜드 가이드".to_string(),
                ],
                delivery_days: 21,
                aliases: vec!["branding".to_string(), "로고".to_string()],
            },
        ];

        let web_tiers =
            vec![ProductId("web-basic".to_string()), ProductId("web-professional".to_string())];
        let all_web = vec![
            ProductId("web-basic".to_string()),
            ProductId("web-professional".to_string()),
            ProductId("web-shopping".to_string()),
        ];

        let options = vec![
            ProductOption {
                id: "extra-pages".to_string(),
                name: "추가 페이지 (5페이지)".to_string(),
                price: OptionPrice::Fixed(won(200_000)),
                applicable: Applicability::Products(web_tiers.clone()),
                aliases: vec!["추가 페이지".to_string(), "extra pages".to_string()],
            },
            ProductOption {
                id: "multi-language".to_string(),
                name: "다국어 지원".to_string(),
                price: OptionPrice::Fixed(won(300_000)),
                applicable: Applicability::Products(all_web),
                aliases: vec!["다국어".to_string(), "multi-language".to_string()],
            },
            ProductOption {
                id: "seo-premium".to_string(),
                name: "프리미엄 SEO".to_string(),
                price: OptionPrice::Fixed(won(500_000)),
                applicable: Applicability::Products(web_tiers),
                aliases: vec!["seo".to_string()],
            },
            ProductOption {
                id: "maintenance-extended".to_string(),
                name: "유지보수 연장 (6개월)".to_string(),
                price: OptionPrice::Fixed(won(600_000)),
                applicable: Applicability::Products(vec![
                    ProductId("web-basic".to_string()),
                    ProductId("web-professional".to_string()),
                    ProductId("app-hybrid".to_string()),
                ]),
                aliases: vec!["유지보수".to_string(), "maintenance".to_string()],
            },
            ProductOption {
                id: "rush-delivery".to_string(),
                name: "빠른 납품 (50% 단축)".to_string(),
                price: OptionPrice::SubtotalPct(Decimal::new(30, 2)),
                applicable: Applicability::All,
                aliases: vec!["빠른 납품".to_string(), "rush".to_string()],
            },
        ];

        let discounts = vec![
            Discount {
                kind: DiscountKind::Bundle,
                name: "패키지 할인".to_string(),
                rate: Decimal::new(10, 2),
            },
            Discount {
                kind: DiscountKind::FirstOrder,
                name: "첫 주문 할인".to_string(),
                rate: Decimal::new(5, 2),
            },
            Discount {
                kind: DiscountKind::Referral,
                name: "추천인 할인".to_string(),
                rate: Decimal::new(5, 2),
            },
        ];

        Catalog { products, options, discounts }
    }
}
