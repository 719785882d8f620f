use std::{env, sync::Arc};

use dotenvy::dotenv;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use analysis::SignalStore;
use common::actors::ActorType;
use common::config::EngineConfig;
use common::logger;
use common::models::{DecisionEvent, NewsItem, TechnicalSnapshot};
use storage::SqliteSignalStore;

use crate::actors::Supervisor;
use crate::services::{AnalysisService, DecisionService, TelegramService};

mod actors;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_logger();
    dotenv().ok();
    debug!("System starting up...");

    let config = EngineConfig::from_env();
    let db_path = env::var("NEWS_DB_PATH").unwrap_or_else(|_| "crypto_trading_news.db".to_string());
    let store: Arc<dyn SignalStore> = Arc::new(SqliteSignalStore::connect(&db_path).await?);

    // Integration points for the excluded collaborators: the feed
    // transport publishes into news_tx, the indicator bot updates
    // technical_tx, and downstream consumers subscribe to decision_tx.
    let (news_tx, _) = broadcast::channel::<Arc<NewsItem>>(1024);
    let (technical_tx, technical_rx) = watch::channel(TechnicalSnapshot::default());
    let (decision_tx, _) = broadcast::channel::<DecisionEvent>(64);

    let mut supervisor = Supervisor::new();

    let store_for_analysis = store.clone();
    let news_tx_for_analysis = news_tx.clone();
    let config_for_analysis = config.clone();
    supervisor.register_actor(
        ActorType::AnalysisActor,
        Box::new(move || {
            Box::new(AnalysisService::new(
                store_for_analysis.clone(),
                news_tx_for_analysis.subscribe(),
                &config_for_analysis,
            ))
        }),
    );

    let store_for_decision = store.clone();
    let technical_rx_for_decision = technical_rx.clone();
    let decision_tx_for_decision = decision_tx.clone();
    let config_for_decision = config.clone();
    supervisor.register_actor(
        ActorType::DecisionActor,
        Box::new(move || {
            Box::new(DecisionService::new(
                store_for_decision.clone(),
                technical_rx_for_decision.clone(),
                decision_tx_for_decision.clone(),
                config_for_decision.clone(),
            ))
        }),
    );

    if let Some(telegram) = TelegramService::from_env() {
        tokio::spawn(telegram.start(decision_tx.subscribe()));
    }

    if let Ok(seed_path) = env::var("NEWS_SEED_JSON") {
        let seed_tx = news_tx.clone();
        tokio::spawn(async move {
            // Replay only once the analysis service has subscribed.
            let step = std::time::Duration::from_millis(200);
            let mut waited = std::time::Duration::ZERO;
            while seed_tx.receiver_count() == 0 && waited < std::time::Duration::from_secs(10) {
                tokio::time::sleep(step).await;
                waited += step;
            }
            match seed_from_file(&seed_path, &seed_tx).await {
                Ok(count) => info!("Seeded {} news items from {}", count, seed_path),
                Err(e) => error!("Failed to seed from {}: {:#}", seed_path, e),
            }
        });
    }

    // Keep the collaborator-facing handles alive for the lifetime of
    // the process.
    let _technical_tx = technical_tx;
    let _news_tx = news_tx;

    supervisor.start().await;
    Ok(())
}

/// Replays a JSON array of news items into the analysis pipeline.
/// Returns the number of items actually delivered to a consumer.
async fn seed_from_file(
    path: &str,
    tx: &broadcast::Sender<Arc<NewsItem>>,
) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let items: Vec<NewsItem> = serde_json::from_str(&raw)?;

    let mut sent = 0;
    let mut dropped = 0;
    for item in items {
        match tx.send(Arc::new(item)) {
            Ok(_) => sent += 1,
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("{} seed items had no live consumer and were dropped", dropped);
    }
    Ok(sent)
}
