use std::fmt;

use serde::{Deserialize, Serialize};

use super::news::Source;
use super::signal::Signal;

/// Aggregate directional advice over a window of stored signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SignalBreakdown {
    #[serde(rename = "BUY")]
    pub buy: usize,
    #[serde(rename = "SELL")]
    pub sell: usize,
    #[serde(rename = "NEUTRAL")]
    pub neutral: usize,
}

/// One of the strongest window signals, summarized for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSummary {
    pub signal: Signal,
    pub confidence: f64,
    pub sentiment: f64,
    pub source: Source,
    pub title: String,
}

/// Overall recommendation, computed fresh on each query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: TradeAction,
    pub overall_confidence: f64,
    pub signal_breakdown: SignalBreakdown,
    pub total_signals: usize,
    pub avg_confidence: f64,
    pub analysis_window_hours: i64,
    pub top_signals: Vec<SignalSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Recommendation {
    /// The modeled empty-window outcome. Not an error.
    pub fn hold(window_hours: i64, reason: String) -> Self {
        Self {
            recommendation: TradeAction::Hold,
            overall_confidence: 0.5,
            signal_breakdown: SignalBreakdown::default(),
            total_signals: 0,
            avg_confidence: 0.0,
            analysis_window_hours: window_hours,
            top_signals: Vec::new(),
            reason: Some(reason),
        }
    }
}

/// Recommendation scoped to one tracked asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecommendation {
    pub entity: String,
    pub recommendation: TradeAction,
    pub confidence: f64,
    pub buy_count: usize,
    pub sell_count: usize,
    pub total_signals: usize,
    pub recent_titles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EntityRecommendation {
    pub fn hold(entity: String, reason: String) -> Self {
        Self {
            entity,
            recommendation: TradeAction::Hold,
            confidence: 0.0,
            buy_count: 0,
            sell_count: 0,
            total_signals: 0,
            recent_titles: Vec::new(),
            reason: Some(reason),
        }
    }
}
