use std::sync::Arc;

use chrono::{Duration, Utc};

use common::config::EngineConfig;
use common::models::{
    EntityRecommendation, PersistedSignal, Recommendation, Signal, SignalBreakdown, SignalSummary,
    TradeAction,
};

use crate::round2;
use crate::store::SignalStore;

const TOP_SIGNALS: usize = 5;
const RECENT_TITLES: usize = 3;
const TITLE_CHARS: usize = 100;
const OVERALL_CONFIDENCE_CAP: f64 = 0.95;

/// Collapses a window of stored signals into one recommendation.
/// Stateless between calls; every query builds a fresh snapshot.
pub struct RecommendationAggregator {
    store: Arc<dyn SignalStore>,
    config: EngineConfig,
}

impl RecommendationAggregator {
    pub fn new(store: Arc<dyn SignalStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Overall recommendation over the trailing `window_hours`.
    ///
    /// A narrow plurality is not enough to turn directional: one side
    /// must beat the other by the configured majority ratio.
    pub async fn aggregate(
        &self,
        min_confidence: f64,
        window_hours: i64,
    ) -> anyhow::Result<Recommendation> {
        let since = Utc::now() - Duration::hours(window_hours);
        let mut records = self.store.query(min_confidence, since).await?;

        if records.is_empty() {
            return Ok(Recommendation::hold(
                window_hours,
                format!(
                    "no signals above {min_confidence:.2} confidence in the last {window_hours} hours"
                ),
            ));
        }

        sort_strongest_first(&mut records);

        let mut breakdown = SignalBreakdown::default();
        let mut total_confidence = 0.0;
        for record in &records {
            match record.signal() {
                Signal::Buy => breakdown.buy += 1,
                Signal::Sell => breakdown.sell += 1,
                Signal::Neutral => breakdown.neutral += 1,
            }
            total_confidence += record.confidence();
        }

        let total = records.len();
        let avg_confidence = total_confidence / total as f64;
        tracing::debug!(
            "aggregating {total} signals in {window_hours}h window: {breakdown:?}"
        );
        let ratio = self.config.majority_ratio;

        let (recommendation, overall_confidence) =
            if breakdown.buy as f64 > breakdown.sell as f64 * ratio {
                (
                    TradeAction::Buy,
                    directional_confidence(breakdown.buy, total, avg_confidence),
                )
            } else if breakdown.sell as f64 > breakdown.buy as f64 * ratio {
                (
                    TradeAction::Sell,
                    directional_confidence(breakdown.sell, total, avg_confidence),
                )
            } else {
                // HOLD carries no directional confidence.
                (TradeAction::Hold, 0.5)
            };

        let top_signals = records.iter().take(TOP_SIGNALS).map(summarize).collect();

        Ok(Recommendation {
            recommendation,
            overall_confidence: round2(overall_confidence),
            signal_breakdown: breakdown,
            total_signals: total,
            avg_confidence: round2(avg_confidence),
            analysis_window_hours: window_hours,
            top_signals,
            reason: None,
        })
    }

    /// Recommendation scoped to one tracked asset. Uses the fixed
    /// entity confidence floor and a plain plurality; a tie holds.
    pub async fn aggregate_for(
        &self,
        entity: &str,
        window_hours: i64,
    ) -> anyhow::Result<EntityRecommendation> {
        let entity = entity.to_uppercase();
        let since = Utc::now() - Duration::hours(window_hours);
        let mut records = self
            .store
            .query_by_entity(&entity, since, self.config.entity_confidence_floor)
            .await?;

        if records.is_empty() {
            return Ok(EntityRecommendation::hold(
                entity.clone(),
                format!("no signals for {entity} in the last {window_hours} hours"),
            ));
        }

        sort_strongest_first(&mut records);

        let buy_count = records.iter().filter(|r| r.signal() == Signal::Buy).count();
        let sell_count = records
            .iter()
            .filter(|r| r.signal() == Signal::Sell)
            .count();
        let avg_confidence =
            records.iter().map(|r| r.confidence()).sum::<f64>() / records.len() as f64;

        let recommendation = if buy_count > sell_count {
            TradeAction::Buy
        } else if sell_count > buy_count {
            TradeAction::Sell
        } else {
            TradeAction::Hold
        };

        let recent_titles = records
            .iter()
            .take(RECENT_TITLES)
            .map(|r| truncate_title(&r.title))
            .collect();

        Ok(EntityRecommendation {
            entity,
            recommendation,
            confidence: round2(avg_confidence),
            buy_count,
            sell_count,
            total_signals: records.len(),
            recent_titles,
            reason: None,
        })
    }
}

fn sort_strongest_first(records: &mut [PersistedSignal]) {
    records.sort_by(|a, b| {
        b.confidence()
            .total_cmp(&a.confidence())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

fn directional_confidence(count: usize, total: usize, avg_confidence: f64) -> f64 {
    OVERALL_CONFIDENCE_CAP.min(count as f64 / total as f64 * avg_confidence)
}

fn summarize(record: &PersistedSignal) -> SignalSummary {
    SignalSummary {
        signal: record.signal(),
        confidence: record.confidence(),
        sentiment: record.record.sentiment_score,
        source: record.source,
        title: truncate_title(&record.title),
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_CHARS {
        let head: String = title.chars().take(TITLE_CHARS).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}
