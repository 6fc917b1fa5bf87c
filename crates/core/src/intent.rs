use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Coarse category of a user message. The order of variants mirrors the
/// order rules are scanned in; see [`KeywordMatcher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Order,
    Confirm,
    Cancel,
    PriceInquiry,
    Website,
    App,
    AiSolution,
    Design,
    ServiceOverview,
    Portfolio,
    Contact,
    Greeting,
    Thanks,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedIntent {
    pub category: IntentCategory,
    pub priority: u8,
    pub matched_keyword: Option<String>,
}

impl MatchedIntent {
    fn fallback() -> Self {
        MatchedIntent { category: IntentCategory::Fallback, priority: 0, matched_keyword: None }
    }
}

struct KeywordSet {
    ko: &'static [&'static str],
    en: &'static [&'static str],
    ja: &'static [&'static str],
    zh: &'static [&'static str],
}

impl KeywordSet {
    fn for_language(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::Ko => self.ko,
            Language::En => self.en,
            Language::Ja => self.ja,
            Language::Zh => self.zh,
        }
    }
}

struct CategoryRule {
    category: IntentCategory,
    priority: u8,
    keywords: KeywordSet,
}

/// Substring keyword matcher. Scans the fixed rule table and returns the
/// highest-priority category with a hit, ties broken by rule order. The
/// target language's keyword list is checked first; if the session language
/// is not the default, the default language's list is also checked so pasted
/// Korean still routes (mirrors the template fallback).
pub struct KeywordMatcher {
    rules: &'static [CategoryRule],
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordMatcher {
    pub fn new() -> Self {
        KeywordMatcher { rules: RULES }
    }

    pub fn match_intent(&self, text: &str, language: Language) -> MatchedIntent {
        let lowered = text.to_lowercase();
        let mut best: Option<MatchedIntent> = None;

        for rule in self.rules {
            let mut keyword_hit = first_hit(&lowered, rule.keywords.for_language(language));
            if keyword_hit.is_none() && language != Language::DEFAULT {
                keyword_hit = first_hit(&lowered, rule.keywords.for_language(Language::DEFAULT));
            }

            let Some(keyword) = keyword_hit else { continue };
            let better = best.as_ref().map(|current| rule.priority > current.priority).unwrap_or(true);
            if better {
                best = Some(MatchedIntent {
                    category: rule.category,
                    priority: rule.priority,
                    matched_keyword: Some(keyword.to_string()),
                });
            }
        }

        best.unwrap_or_else(MatchedIntent::fallback)
    }
}

fn first_hit(lowered: &str, keywords: &'static [&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|keyword| lowered.contains(keyword))
}

static RULES: &[CategoryRule] = &[
    CategoryRule {
        category: IntentCategory::Order,
        priority: 90,
        keywords: KeywordSet {
            ko: &["주문", "발주", "계약", "진행할게"],
            en: &["order", "sign the contract", "let's proceed"],
            ja: &["注文", "契約"],
            zh: &["下单", "订购", "签约"],
        },
    },
    CategoryRule {
        category: IntentCategory::Confirm,
        priority: 85,
        keywords: KeywordSet {
            ko: &["확정", "진행", "좋아요"],
            en: &["confirm", "go ahead", "sounds good"],
            ja: &["確定", "お願いします"],
            zh: &["确认", "确定"],
        },
    },
    CategoryRule {
        category: IntentCategory::Cancel,
        priority: 85,
        keywords: KeywordSet {
            ko: &["취소", "처음으로", "그만"],
            en: &["cancel", "start over", "never mind"],
            ja: &["キャンセル", "最初から", "やめ"],
            zh: &["取消", "重新开始"],
        },
    },
    CategoryRule {
        category: IntentCategory::PriceInquiry,
        priority: 80,
        keywords: KeywordSet {
            ko: &["가격", "얼마", "비용", "견적", "예산"],
            en: &["price", "cost", "quote", "budget", "how much"],
            ja: &["料金", "見積", "いくら", "予算"],
            zh: &["价格", "报价", "多少钱", "预算"],
        },
    },
    CategoryRule {
        category: IntentCategory::Website,
        priority: 70,
        keywords: KeywordSet {
            ko: &["웹", "홈페이지", "사이트", "쇼핑몰", "랜딩"],
            en: &["website", "web site", "homepage", "landing page", "e-commerce"],
            ja: &["ウェブ", "サイト", "ホームページ"],
            zh: &["网站", "网页", "电商"],
        },
    },
    CategoryRule {
        category: IntentCategory::App,
        priority: 70,
        keywords: KeywordSet {
            ko: &["앱", "모바일", "아이폰", "안드로이드"],
            en: &["an app", "app development", "mobile", "iphone", "android"],
            ja: &["アプリ", "モバイル"],
            zh: &["应用", "手机软件", "安卓"],
        },
    },
    CategoryRule {
        category: IntentCategory::AiSolution,
        priority: 70,
        keywords: KeywordSet {
            ko: &["챗봇", "자동화", "인공지능", "ai 솔루션", "ai솔루션"],
            en: &["chatbot", "automation", "artificial intelligence", "ai solution"],
            ja: &["チャットボット", "自動化", "人工知能"],
            zh: &["聊天机器人", "自动化", "人工智能"],
        },
    },
    CategoryRule {
        category: IntentCategory::Design,
        priority: 70,
        keywords: KeywordSet {
            ko: &["디자인", "로고", "브랜딩"],
            en: &["design", "logo", "branding"],
            ja: &["デザイン", "ロゴ"],
            zh: &["设计", "品牌"],
        },
    },
    CategoryRule {
        category: IntentCategory::ServiceOverview,
        priority: 60,
        keywords: KeywordSet {
            ko: &["서비스", "뭐해", "종류", "어떤것"],
            en: &["services", "what do you do", "what do you offer"],
            ja: &["サービス", "何が"],
            zh: &["服务", "你们做什么"],
        },
    },
    CategoryRule {
        category: IntentCategory::Portfolio,
        priority: 60,
        keywords: KeywordSet {
            ko: &["포트폴리오", "작업물", "사례", "레퍼런스"],
            en: &["portfolio", "case study", "past work", "references"],
            ja: &["ポートフォリオ", "実績", "事例"],
            zh: &["作品", "案例"],
        },
    },
    CategoryRule {
        category: IntentCategory::Contact,
        priority: 60,
        keywords: KeywordSet {
            ko: &["연락", "전화", "상담", "예약", "담당자"],
            en: &["contact", "consult", "appointment", "call me", "talk to someone"],
            ja: &["相談", "連絡", "予約", "担当"],
            zh: &["联系", "咨询", "预约"],
        },
    },
    CategoryRule {
        category: IntentCategory::Greeting,
        priority: 50,
        keywords: KeywordSet {
            ko: &["안녕", "하이", "반가"],
            en: &["hello", "hi there", "hey", "good morning"],
            ja: &["こんにちは", "はじめまして", "おはよう"],
            zh: &["你好", "您好"],
        },
    },
    CategoryRule {
        category: IntentCategory::Thanks,
        priority: 50,
        keywords: KeywordSet {
            ko: &["감사", "고마워", "땡큐"],
            en: &["thanks", "thank you", "appreciate"],
            ja: &["ありがとう", "感謝"],
            zh: &["谢谢", "感谢"],
        },
    },
];
