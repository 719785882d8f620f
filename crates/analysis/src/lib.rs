pub mod aggregator;
pub mod combiner;
pub mod entities;
pub mod generator;
pub mod lexicon;
pub mod sentiment;
pub mod store;

pub use aggregator::RecommendationAggregator;
pub use entities::EntityExtractor;
pub use generator::SignalGenerator;
pub use store::SignalStore;

/// Scores are reported with two decimal places; comparisons elsewhere
/// use the rounded value.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
