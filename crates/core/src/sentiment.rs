use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Clamped to [-1.0, 1.0].
    pub score: f32,
    pub sentiment: Sentiment,
    /// Urgency is orthogonal to polarity; an angry rush and a polite rush
    /// both set it.
    pub urgent: bool,
}

const POSITIVE_THRESHOLD: f32 = 0.3;
const NEGATIVE_THRESHOLD: f32 = -0.3;

const KEYWORD_WEIGHT: f32 = 0.4;
const EMOJI_WEIGHT: f32 = 0.3;

const POSITIVE_KEYWORDS: &[&str] = &[
    "감사", "좋아요", "최고", "만족", "친절",
    "thank", "great", "perfect", "awesome", "excellent", "good", "happy", "love",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "별로", "불만", "실망", "최악", "화가", "늦어",
    "angry", "frustrated", "terrible", "awful", "horrible", "hate", "disappointed", "problem",
    "issue",
];

const URGENT_KEYWORDS: &[&str] = &[
    "긴급", "급해", "빨리", "당장", "오늘까지",
    "urgent", "asap", "immediately", "emergency", "right now", "critical",
];

const POSITIVE_EMOJI: &[&str] = &["😊", "😍", "👍", "🙏", "❤", "🎉"];
const NEGATIVE_EMOJI: &[&str] = &["😡", "😠", "😞", "👎", "💢"];

/// Word-list sentiment scoring. Deliberately crude: weighted keyword and
/// emoji hits, clamped, thresholded. Advisory signal only, never gates the
/// state machine.
#[derive(Clone, Debug, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> SentimentReport {
        let lowered = text.to_lowercase();

        let mut score = 0.0f32;
        score += count_hits(&lowered, POSITIVE_KEYWORDS) as f32 * KEYWORD_WEIGHT;
        score -= count_hits(&lowered, NEGATIVE_KEYWORDS) as f32 * KEYWORD_WEIGHT;
        score += count_hits(text, POSITIVE_EMOJI) as f32 * EMOJI_WEIGHT;
        score -= count_hits(text, NEGATIVE_EMOJI) as f32 * EMOJI_WEIGHT;
        let score = score.clamp(-1.0, 1.0);

        let sentiment = if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        let urgent = URGENT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword));

        SentimentReport { score, sentiment, urgent }
    }
}

fn count_hits(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|needle| haystack.contains(*needle)).count()
}
