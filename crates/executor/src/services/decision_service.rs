use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use analysis::{RecommendationAggregator, SignalStore, combiner};
use common::actors::{Actor, ActorType, ControlMessage};
use common::config::EngineConfig;
use common::models::{DecisionEvent, FinalDecision, TechnicalSnapshot};

/// Periodically aggregates the stored news signals, fuses the result
/// with the latest technical snapshot and emits a `DecisionEvent`
/// whenever the fusion yields a trade.
pub struct DecisionService {
    id: Uuid,
    aggregator: RecommendationAggregator,
    technical_rx: watch::Receiver<TechnicalSnapshot>,
    decision_tx: broadcast::Sender<DecisionEvent>,
    config: EngineConfig,
}

#[async_trait]
impl Actor for DecisionService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::DecisionActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        info!("Starting Decision Service");
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.evaluation_interval_secs));

        loop {
            interval.tick().await;

            if let Err(e) = self.evaluate().await {
                // The aggregation failed (store unavailable); report and
                // keep the cycle running, the next tick retries.
                warn!("Decision cycle failed: {:#}", e);
                supervisor_tx
                    .send(ControlMessage::Error(self.id, format!("{e:#}")))
                    .await?;
            }
        }
    }
}

impl DecisionService {
    pub fn new(
        store: Arc<dyn SignalStore>,
        technical_rx: watch::Receiver<TechnicalSnapshot>,
        decision_tx: broadcast::Sender<DecisionEvent>,
        config: EngineConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            aggregator: RecommendationAggregator::new(store, config.clone()),
            technical_rx,
            decision_tx,
            config,
        }
    }

    async fn evaluate(&self) -> anyhow::Result<()> {
        let recommendation = self
            .aggregator
            .aggregate(self.config.min_confidence, self.config.window_hours)
            .await?;

        let technical = *self.technical_rx.borrow();
        let news = combiner::news_signal(&recommendation, self.config.news_gate_confidence);
        let decision = combiner::combine(technical.primary, technical.secondary, news);

        debug!(
            "Evaluation: technical={:?}/{:?} news={} ({:.2} over {} signals) -> {}",
            technical.primary,
            technical.secondary,
            news,
            recommendation.overall_confidence,
            recommendation.total_signals,
            decision
        );

        if decision != FinalDecision::NoTrade {
            info!(
                "Trade decision: {} (news {} at {:.2}, {} signals in window)",
                decision,
                recommendation.recommendation,
                recommendation.overall_confidence,
                recommendation.total_signals
            );
            let _ = self.decision_tx.send(DecisionEvent {
                decision,
                news_recommendation: recommendation.recommendation,
                news_confidence: recommendation.overall_confidence,
                total_signals: recommendation.total_signals,
                technical,
            });
        }

        Ok(())
    }
}
