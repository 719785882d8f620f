//! Classified keyword lists and source reliability weights.
//!
//! Terms are matched by case-insensitive presence, not stemming, so
//! "rally" also fires inside "rallies". The lists are deliberately
//! short and hand-curated.

use common::models::Source;

pub const BULLISH: &[&str] = &[
    "bullish",
    "moon",
    "rally",
    "surge",
    "breakout",
    "pump",
    "growth",
    "adoption",
    "partnership",
    "approval",
    "investment",
    "institutional",
    "etf",
    "buying",
    "rocket",
    "bull run",
    "positive",
    "optimistic",
];

pub const BEARISH: &[&str] = &[
    "bearish",
    "crash",
    "dump",
    "correction",
    "decline",
    "sell-off",
    "ban",
    "regulation",
    "hack",
    "exploit",
    "liquidation",
    "fear",
    "drop",
    "fall",
    "plunge",
    "red",
    "negative",
    "pessimistic",
];

/// Macroeconomic and regulatory terms that raise confidence regardless
/// of sentiment polarity.
pub const HIGH_IMPACT: &[&str] = &[
    "fed",
    "federal reserve",
    "interest rate",
    "inflation",
    "cpi",
    "employment",
    "gdp",
    "tariff",
    "trade war",
    "government shutdown",
    "sec",
    "regulatory",
    "jerome powell",
    "yellen",
    "treasury",
];

/// Per-source confidence multiplier, in [0.7, 1.0]. Applied last and
/// never capped; unknown outlets get the floor.
pub fn source_reliability(source: Source) -> f64 {
    match source {
        Source::Coindesk => 1.0,
        Source::Cointelegraph => 0.95,
        Source::BitcoinCom => 0.9,
        Source::Decrypt => 0.9,
        Source::Cryptonews => 0.85,
        Source::Bitcoinist => 0.85,
        Source::Cryptoslate => 0.85,
        Source::Unknown => 0.7,
    }
}
