use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use analysis::SignalStore;
use common::models::{PersistedSignal, Signal, SignalRecord, Source};

/// SQLite-backed signal store. One row per URL; a re-seen URL
/// overwrites the prior row.
pub struct SqliteSignalStore {
    pool: SqlitePool,
}

/// Matched keyword sets, persisted together as one JSON column.
#[derive(Serialize, Deserialize)]
struct KeywordColumn {
    high_impact: Vec<String>,
    bullish: Vec<String>,
    bearish: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct SignalRow {
    title: String,
    url: String,
    source: String,
    published_date: Option<String>,
    content: String,
    sentiment_score: f64,
    trading_signal: String,
    confidence: f64,
    entity_mentions: String,
    keywords: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SignalRow> for PersistedSignal {
    type Error = anyhow::Error;

    fn try_from(row: SignalRow) -> Result<Self, Self::Error> {
        let signal: Signal = row.trading_signal.parse()?;
        let entity_mentions: Vec<String> = serde_json::from_str(&row.entity_mentions)?;
        let keywords: KeywordColumn = serde_json::from_str(&row.keywords)?;

        Ok(PersistedSignal {
            url: row.url,
            title: row.title,
            source: Source::from_name(&row.source),
            published_date: row.published_date,
            content_excerpt: row.content,
            record: SignalRecord {
                signal,
                confidence: row.confidence,
                sentiment_score: row.sentiment_score,
                entity_mentions,
                high_impact_keywords: keywords.high_impact,
                bullish_words: keywords.bullish,
                bearish_words: keywords.bearish,
            },
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT title, url, source, published_date, content, sentiment_score,
           trading_signal, confidence, entity_mentions, keywords, created_at
    FROM news_signals
"#;

impl SqliteSignalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(db_path: &str) -> Result<Self, sqlx::Error> {
        Ok(Self::new(crate::db::connect(db_path).await?))
    }

    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Ok(Self::new(crate::db::connect_in_memory().await?))
    }

    fn rows_to_signals(rows: Vec<SignalRow>) -> anyhow::Result<Vec<PersistedSignal>> {
        rows.into_iter().map(PersistedSignal::try_from).collect()
    }
}

#[async_trait]
impl SignalStore for SqliteSignalStore {
    async fn upsert(&self, signal: &PersistedSignal) -> anyhow::Result<()> {
        let keywords = serde_json::to_string(&KeywordColumn {
            high_impact: signal.record.high_impact_keywords.clone(),
            bullish: signal.record.bullish_words.clone(),
            bearish: signal.record.bearish_words.clone(),
        })?;
        let entity_mentions = serde_json::to_string(&signal.record.entity_mentions)?;

        sqlx::query(
            r#"
                INSERT INTO news_signals (
                    title, url, source, published_date, content, sentiment_score,
                    trading_signal, confidence, entity_mentions, keywords, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    source = excluded.source,
                    published_date = excluded.published_date,
                    content = excluded.content,
                    sentiment_score = excluded.sentiment_score,
                    trading_signal = excluded.trading_signal,
                    confidence = excluded.confidence,
                    entity_mentions = excluded.entity_mentions,
                    keywords = excluded.keywords,
                    created_at = excluded.created_at
            "#,
        )
        .bind(&signal.title)
        .bind(&signal.url)
        .bind(signal.source.as_str())
        .bind(&signal.published_date)
        .bind(&signal.content_excerpt)
        .bind(signal.record.sentiment_score)
        .bind(signal.record.signal.as_str())
        .bind(signal.record.confidence)
        .bind(entity_mentions)
        .bind(keywords)
        .bind(signal.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(
        &self,
        min_confidence: f64,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PersistedSignal>> {
        let rows = sqlx::query_as::<_, SignalRow>(&format!(
            "{SELECT_COLUMNS} WHERE confidence > ? AND created_at > ? \
             ORDER BY confidence DESC, created_at DESC"
        ))
        .bind(min_confidence)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Self::rows_to_signals(rows)
    }

    async fn query_by_entity(
        &self,
        entity: &str,
        since: DateTime<Utc>,
        min_confidence: f64,
    ) -> anyhow::Result<Vec<PersistedSignal>> {
        // The LIKE clause is a coarse prefilter over the JSON column;
        // the exact membership check happens on the decoded rows.
        let rows = sqlx::query_as::<_, SignalRow>(&format!(
            "{SELECT_COLUMNS} WHERE confidence > ? AND created_at > ? \
             AND entity_mentions LIKE ? \
             ORDER BY confidence DESC, created_at DESC"
        ))
        .bind(min_confidence)
        .bind(since)
        .bind(format!("%\"{entity}\"%"))
        .fetch_all(&self.pool)
        .await?;

        let signals = Self::rows_to_signals(rows)?;
        Ok(signals
            .into_iter()
            .filter(|s| s.record.entity_mentions.iter().any(|m| m == entity))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use common::models::NewsItem;

    fn record(kind: Signal, confidence: f64, mentions: &[&str]) -> SignalRecord {
        SignalRecord {
            signal: kind,
            confidence,
            sentiment_score: 0.4,
            entity_mentions: mentions.iter().map(|m| m.to_string()).collect(),
            high_impact_keywords: vec!["fed".to_string()],
            bullish_words: vec!["rally".to_string()],
            bearish_words: vec![],
        }
    }

    fn persisted(
        url: &str,
        kind: Signal,
        confidence: f64,
        mentions: &[&str],
        created_at: DateTime<Utc>,
    ) -> PersistedSignal {
        let item = NewsItem {
            title: format!("article {url}"),
            url: url.to_string(),
            source: Source::Coindesk,
            published: None,
            content: "body".to_string(),
        };
        PersistedSignal::from_item(&item, record(kind, confidence, mentions), created_at)
    }

    #[tokio::test]
    async fn upsert_by_url_keeps_latest_values() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();

        let first = persisted("https://x/1", Signal::Buy, 0.7, &["BITCOIN"], now);
        let mut second = persisted("https://x/1", Signal::Sell, 0.9, &["BITCOIN"], now);
        second.title = "updated".to_string();

        store.upsert(&first).await.unwrap();
        store.upsert(&second).await.unwrap();

        let signals = store.query(0.0, now - Duration::hours(1)).await.unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].title, "updated");
        assert_eq!(signals[0].signal(), Signal::Sell);
        assert_eq!(signals[0].confidence(), 0.9);
    }

    #[tokio::test]
    async fn query_filters_confidence_and_window() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();

        store
            .upsert(&persisted("https://x/strong", Signal::Buy, 0.9, &[], now))
            .await
            .unwrap();
        store
            .upsert(&persisted("https://x/weak", Signal::Buy, 0.5, &[], now))
            .await
            .unwrap();
        store
            .upsert(&persisted(
                "https://x/old",
                Signal::Buy,
                0.9,
                &[],
                now - Duration::hours(12),
            ))
            .await
            .unwrap();

        let signals = store.query(0.65, now - Duration::hours(6)).await.unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].url, "https://x/strong");
    }

    #[tokio::test]
    async fn confidence_floor_is_strict() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();
        store
            .upsert(&persisted("https://x/edge", Signal::Buy, 0.65, &[], now))
            .await
            .unwrap();

        assert!(store
            .query(0.65, now - Duration::hours(1))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store.query(0.64, now - Duration::hours(1)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn query_orders_strongest_first() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();
        for (url, confidence) in [("https://x/a", 0.7), ("https://x/b", 0.9), ("https://x/c", 0.8)]
        {
            store
                .upsert(&persisted(url, Signal::Buy, confidence, &[], now))
                .await
                .unwrap();
        }

        let signals = store.query(0.0, now - Duration::hours(1)).await.unwrap();
        let confidences: Vec<f64> = signals.iter().map(|s| s.confidence()).collect();
        assert_eq!(confidences, vec![0.9, 0.8, 0.7]);
    }

    #[tokio::test]
    async fn entity_query_matches_membership_exactly() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();

        store
            .upsert(&persisted(
                "https://x/btc",
                Signal::Buy,
                0.8,
                &["BITCOIN"],
                now,
            ))
            .await
            .unwrap();
        store
            .upsert(&persisted(
                "https://x/eth",
                Signal::Sell,
                0.8,
                &["ETHEREUM"],
                now,
            ))
            .await
            .unwrap();
        store
            .upsert(&persisted(
                "https://x/weak-btc",
                Signal::Buy,
                0.5,
                &["BITCOIN"],
                now,
            ))
            .await
            .unwrap();

        let signals = store
            .query_by_entity("BITCOIN", now - Duration::hours(1), 0.6)
            .await
            .unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].url, "https://x/btc");
    }

    #[tokio::test]
    async fn keyword_sets_roundtrip() {
        let store = SqliteSignalStore::in_memory().await.unwrap();
        let now = Utc::now();
        store
            .upsert(&persisted("https://x/kw", Signal::Buy, 0.8, &["BITCOIN"], now))
            .await
            .unwrap();

        let signals = store.query(0.0, now - Duration::hours(1)).await.unwrap();
        let record = &signals[0].record;
        assert_eq!(record.high_impact_keywords, vec!["fed"]);
        assert_eq!(record.bullish_words, vec!["rally"]);
        assert!(record.bearish_words.is_empty());
        assert_eq!(signals[0].source, Source::Coindesk);
    }
}
