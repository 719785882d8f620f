pub mod decision;
pub mod news;
pub mod recommendation;
pub mod signal;

pub use decision::{DecisionEvent, Direction, FinalDecision, TechnicalSnapshot};
pub use news::{NewsItem, Source};
pub use recommendation::{
    EntityRecommendation, Recommendation, SignalBreakdown, SignalSummary, TradeAction,
};
pub use signal::{ParseSignalError, PersistedSignal, Signal, SignalRecord};
