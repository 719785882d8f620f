use std::fmt;

use serde::{Deserialize, Serialize};

use super::recommendation::TradeAction;
use super::signal::Signal;

/// Direction of a technical indicator signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_signal(&self) -> Signal {
        match self {
            Self::Buy => Signal::Buy,
            Self::Sell => Signal::Sell,
        }
    }
}

/// Latest technical evaluation, as supplied by the indicator collaborator.
/// `None` means the indicator produced no signal this cycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub primary: Option<Direction>,
    pub secondary: Option<Direction>,
}

/// Final fused trade decision. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalDecision {
    Buy,
    Sell,
    NoTrade,
}

impl From<Direction> for FinalDecision {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Self::Buy,
            Direction::Sell => Self::Sell,
        }
    }
}

impl fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::NoTrade => "NO_TRADE",
        };
        f.write_str(label)
    }
}

/// Emitted by the decision service whenever fusion yields a trade.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionEvent {
    pub decision: FinalDecision,
    pub news_recommendation: TradeAction,
    pub news_confidence: f64,
    pub total_signals: usize,
    pub technical: TechnicalSnapshot,
}
