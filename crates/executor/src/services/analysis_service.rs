use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use analysis::{SignalGenerator, SignalStore};
use common::actors::{Actor, ActorType, ControlMessage};
use common::config::EngineConfig;
use common::models::{NewsItem, PersistedSignal};

/// Scores every incoming news item and persists the resulting signal.
///
/// One bad item never takes the batch down: scoring or persistence
/// failures are logged and the loop moves on.
pub struct AnalysisService {
    id: Uuid,
    generator: SignalGenerator,
    store: Arc<dyn SignalStore>,
    news_rx: broadcast::Receiver<Arc<NewsItem>>,
    min_confidence: f64,
}

#[async_trait]
impl Actor for AnalysisService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::AnalysisActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        info!("Starting News Analysis Service");

        loop {
            let received = self.news_rx.recv().await;
            match received {
                Ok(item) => {
                    if let Err(e) = self.process_item(item.as_ref()).await {
                        error!("Failed to process {}: {:#}", item.url, e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Analysis service lagged: missed {} items", n);
                }
                Err(_) => {
                    let err_msg = "News channel closed. Stopping service.".to_string();
                    supervisor_tx
                        .send(ControlMessage::Error(self.id, err_msg.clone()))
                        .await?;
                    bail!(err_msg);
                }
            }
        }
    }
}

impl AnalysisService {
    pub fn new(
        store: Arc<dyn SignalStore>,
        news_rx: broadcast::Receiver<Arc<NewsItem>>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generator: SignalGenerator::new(config),
            store,
            news_rx,
            min_confidence: config.min_confidence,
        }
    }

    async fn process_item(&self, item: &NewsItem) -> anyhow::Result<()> {
        let record = self.generator.generate(item);

        if record.confidence >= self.min_confidence {
            info!(
                "Signal {} ({:.2}) from {}: {}",
                record.signal, record.confidence, item.source, item.title
            );
            if !record.entity_mentions.is_empty() {
                info!("  mentions: {}", record.entity_mentions.join(", "));
            }
            if !record.high_impact_keywords.is_empty() {
                info!("  impact terms: {}", record.high_impact_keywords.join(", "));
            }
        } else {
            debug!(
                "Signal {} ({:.2}) below floor for {}",
                record.signal, record.confidence, item.url
            );
        }

        let persisted = PersistedSignal::from_item(item, record, Utc::now());
        self.store.upsert(&persisted).await
    }
}
