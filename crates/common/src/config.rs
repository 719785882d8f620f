use std::env;

/// Tunable thresholds of the scoring and fusion pipeline.
///
/// Defaults match the calibrated production values; each field can be
/// overridden through a `NEWS_*` environment variable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sentiment magnitude required before a directional signal is emitted.
    pub sentiment_threshold: f64,
    /// Majority ratio one side must reach over the other before the
    /// aggregate recommendation turns directional.
    pub majority_ratio: f64,
    /// Confidence floor for signals entering the overall aggregation.
    pub min_confidence: f64,
    /// Trailing window for the overall recommendation, in hours.
    pub window_hours: i64,
    /// Trailing window for per-entity recommendations, in hours.
    pub entity_window_hours: i64,
    /// Confidence floor for per-entity queries. Fixed by design,
    /// independent of `min_confidence`.
    pub entity_confidence_floor: f64,
    /// Overall confidence an aggregate recommendation needs before it
    /// counts as a directional news signal in fusion.
    pub news_gate_confidence: f64,
    /// Seconds between decision evaluations in the executor.
    pub evaluation_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sentiment_threshold: 0.2,
            majority_ratio: 1.5,
            min_confidence: 0.65,
            window_hours: 6,
            entity_window_hours: 24,
            entity_confidence_floor: 0.6,
            news_gate_confidence: 0.7,
            evaluation_interval_secs: 60,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sentiment_threshold: read_var("NEWS_SENTIMENT_THRESHOLD", defaults.sentiment_threshold),
            majority_ratio: read_var("NEWS_MAJORITY_RATIO", defaults.majority_ratio),
            min_confidence: read_var("NEWS_MIN_CONFIDENCE", defaults.min_confidence),
            window_hours: read_var("NEWS_WINDOW_HOURS", defaults.window_hours),
            entity_window_hours: read_var("NEWS_ENTITY_WINDOW_HOURS", defaults.entity_window_hours),
            entity_confidence_floor: defaults.entity_confidence_floor,
            news_gate_confidence: read_var("NEWS_GATE_CONFIDENCE", defaults.news_gate_confidence),
            evaluation_interval_secs: read_var(
                "NEWS_EVAL_INTERVAL_SECS",
                defaults.evaluation_interval_secs,
            ),
        }
    }
}

fn read_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or(default),
        Err(_) => default,
    }
}
