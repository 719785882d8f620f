use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::news::{NewsItem, Source};

/// Upper bound on the content excerpt kept with a persisted signal.
pub const CONTENT_EXCERPT_CHARS: usize = 500;

/// Per-article directional signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown trading signal: {0}")]
pub struct ParseSignalError(String);

impl FromStr for Signal {
    type Err = ParseSignalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "NEUTRAL" => Ok(Self::Neutral),
            other => Err(ParseSignalError(other.to_string())),
        }
    }
}

/// Outcome of scoring exactly one news item. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal: Signal,
    /// In [0, 0.95], rounded to two decimals.
    pub confidence: f64,
    /// In [-1, 1], rounded to two decimals.
    pub sentiment_score: f64,
    pub entity_mentions: Vec<String>,
    pub high_impact_keywords: Vec<String>,
    pub bullish_words: Vec<String>,
    pub bearish_words: Vec<String>,
}

/// A `SignalRecord` enriched with article metadata, as stored by the
/// signal store. At most one row exists per URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSignal {
    pub url: String,
    pub title: String,
    pub source: Source,
    pub published_date: Option<String>,
    pub content_excerpt: String,
    #[serde(flatten)]
    pub record: SignalRecord,
    pub created_at: DateTime<Utc>,
}

impl PersistedSignal {
    pub fn from_item(item: &NewsItem, record: SignalRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            url: item.url.clone(),
            title: item.title.clone(),
            source: item.source,
            published_date: item.published.clone(),
            content_excerpt: item.content.chars().take(CONTENT_EXCERPT_CHARS).collect(),
            record,
            created_at,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.record.confidence
    }

    pub fn signal(&self) -> Signal {
        self.record.signal
    }
}
