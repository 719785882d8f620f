//! Fusion of technical indicator signals with the news recommendation.

use common::models::{Direction, FinalDecision, Recommendation, Signal, TradeAction};

/// Decides whether to act on a technical signal given the news stance.
///
/// No technical signal means no trade. Neutral or confirming news lets
/// the technical signal through, primary preferred over secondary.
/// Contradicting news always vetoes the trade, even when both technical
/// signals agree with each other.
pub fn combine(
    primary: Option<Direction>,
    secondary: Option<Direction>,
    news: Signal,
) -> FinalDecision {
    let Some(technical) = primary.or(secondary) else {
        return FinalDecision::NoTrade;
    };

    match news {
        Signal::Neutral => technical.into(),
        confirming if confirming == technical.as_signal() => technical.into(),
        _ => FinalDecision::NoTrade,
    }
}

/// Derives the news signal the combiner consumes from an aggregate
/// recommendation. Only a recommendation at or above the confidence
/// gate counts as directional; anything weaker reads as NEUTRAL.
pub fn news_signal(recommendation: &Recommendation, gate: f64) -> Signal {
    if recommendation.overall_confidence < gate {
        return Signal::Neutral;
    }
    match recommendation.recommendation {
        TradeAction::Buy => Signal::Buy,
        TradeAction::Sell => Signal::Sell,
        TradeAction::Hold => Signal::Neutral,
    }
}
