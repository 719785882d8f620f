use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::models::PersistedSignal;

/// Durable signal store collaborator.
///
/// Implementations must upsert by URL (one row per URL, latest values
/// win) and support timestamp-range plus confidence-floor filtering.
/// Readers must see a consistent snapshot for a given window query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn upsert(&self, signal: &PersistedSignal) -> anyhow::Result<()>;

    /// Signals with confidence strictly above `min_confidence` created
    /// after `since`, strongest first.
    async fn query(
        &self,
        min_confidence: f64,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PersistedSignal>>;

    /// Window query narrowed to records mentioning `entity`.
    async fn query_by_entity(
        &self,
        entity: &str,
        since: DateTime<Utc>,
        min_confidence: f64,
    ) -> anyhow::Result<Vec<PersistedSignal>>;
}
