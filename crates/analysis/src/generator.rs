use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use common::config::EngineConfig;
use common::models::{NewsItem, Signal, SignalRecord};

use crate::entities::EntityExtractor;
use crate::{lexicon, round2, sentiment};

/// Confidence never exceeds this; the ceiling is re-applied after every
/// boost so no intermediate value passes it either. The source
/// multiplier comes after and is allowed to pull the value back down.
const CONFIDENCE_CEILING: f64 = 0.95;
const IMPACT_BOOST_PER_KEYWORD: f64 = 0.15;
const ENTITY_BOOST: f64 = 0.05;
const RECENCY_BOOST: f64 = 0.05;
const RECENCY_WINDOW_HOURS: i64 = 2;

/// Turns one news item into a `(signal, confidence)` record.
///
/// Pure apart from the wall clock used by the recency check; safe to
/// share across tasks.
pub struct SignalGenerator {
    extractor: EntityExtractor,
    sentiment_threshold: f64,
}

impl SignalGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            extractor: EntityExtractor::new(),
            sentiment_threshold: config.sentiment_threshold,
        }
    }

    pub fn generate(&self, item: &NewsItem) -> SignalRecord {
        self.generate_at(item, Utc::now())
    }

    fn generate_at(&self, item: &NewsItem, now: DateTime<Utc>) -> SignalRecord {
        let full_text = format!("{} {}", item.title, item.content).to_lowercase();

        let breakdown = sentiment::score(&full_text);
        let high_impact = sentiment::high_impact(&full_text);
        let mentions = self.extractor.extract(&full_text);

        // Weak sentiment stays NEUTRAL so noise never turns directional.
        let (signal, mut confidence) = if breakdown.score > self.sentiment_threshold {
            (Signal::Buy, 0.6 + breakdown.score.abs() * 0.3)
        } else if breakdown.score < -self.sentiment_threshold {
            (Signal::Sell, 0.6 + breakdown.score.abs() * 0.3)
        } else {
            (Signal::Neutral, 0.5)
        };

        if !high_impact.is_empty() {
            confidence = boost(confidence, high_impact.len() as f64 * IMPACT_BOOST_PER_KEYWORD);
        }
        if !mentions.is_empty() {
            confidence = boost(confidence, ENTITY_BOOST);
        }
        if is_recent(item.published.as_deref(), now) {
            confidence = boost(confidence, RECENCY_BOOST);
        }

        confidence *= lexicon::source_reliability(item.source);

        SignalRecord {
            signal,
            confidence: round2(confidence),
            sentiment_score: round2(breakdown.score),
            entity_mentions: mentions,
            high_impact_keywords: high_impact,
            bullish_words: breakdown.bullish,
            bearish_words: breakdown.bearish,
        }
    }
}

fn boost(confidence: f64, amount: f64) -> f64 {
    CONFIDENCE_CEILING.min(confidence + amount)
}

/// Missing or unparseable timestamps count as "not recent" and never
/// fail the generation.
fn is_recent(published: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(raw) = published else {
        return false;
    };
    let Some(published_at) = parse_published(raw) else {
        return false;
    };
    now.signed_duration_since(published_at) < Duration::hours(RECENCY_WINDOW_HOURS)
}

fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Feeds occasionally drop the zone suffix; take the first 19 chars.
    let head = raw.get(..19)?;
    NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::Source;

    fn generator() -> SignalGenerator {
        SignalGenerator::new(&EngineConfig::default())
    }

    fn item(title: &str, source: Source, published: Option<String>) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: "https://example.com/a/1".to_string(),
            source,
            published,
            content: String::new(),
        }
    }

    #[test]
    fn bullish_macro_scenario_caps_at_ceiling() {
        let now = Utc::now();
        let article = item(
            "Bitcoin rallies as Fed signals rate cut, institutional adoption surges",
            Source::Coindesk,
            Some(now.to_rfc3339()),
        );

        let record = generator().generate_at(&article, now);

        assert_eq!(record.signal, Signal::Buy);
        assert_eq!(record.sentiment_score, 1.0);
        assert!(record.bullish_words.contains(&"rally".to_string()));
        assert_eq!(record.high_impact_keywords, vec!["fed"]);
        assert_eq!(record.entity_mentions, vec!["BITCOIN"]);
        // 0.9 base, capped at 0.95 through the boosts, full source weight.
        assert_eq!(record.confidence, 0.95);
    }

    #[test]
    fn unmatched_text_is_neutral_scaled_by_source() {
        let record = generator().generate_at(
            &item("the weather stayed mild today", Source::Unknown, None),
            Utc::now(),
        );
        assert_eq!(record.signal, Signal::Neutral);
        assert_eq!(record.sentiment_score, 0.0);
        assert_eq!(record.confidence, 0.35);
    }

    #[test]
    fn bearish_text_turns_sell() {
        let record = generator().generate_at(
            &item(
                "portfolio margin tumbles amid sharp decline and panic dump",
                Source::BitcoinCom,
                None,
            ),
            Utc::now(),
        );
        assert_eq!(record.signal, Signal::Sell);
        assert_eq!(record.sentiment_score, -1.0);
        // 0.9 base, no boosts, 0.9 source weight.
        assert_eq!(record.confidence, 0.81);
    }

    #[test]
    fn threshold_is_strict() {
        // 3 bullish vs 2 bearish terms -> sentiment exactly 0.2.
        let record = generator().generate_at(
            &item(
                "rally surge breakout despite crash and dump",
                Source::Coindesk,
                None,
            ),
            Utc::now(),
        );
        assert_eq!(record.sentiment_score, 0.2);
        assert_eq!(record.signal, Signal::Neutral);
        assert_eq!(record.confidence, 0.5);
    }

    #[test]
    fn recent_publication_adds_boost() {
        let now = Utc::now();
        let fresh = generator().generate_at(
            &item(
                "the weather stayed mild today",
                Source::Coindesk,
                Some((now - Duration::minutes(30)).to_rfc3339()),
            ),
            now,
        );
        let stale = generator().generate_at(
            &item(
                "the weather stayed mild today",
                Source::Coindesk,
                Some((now - Duration::hours(5)).to_rfc3339()),
            ),
            now,
        );
        assert_eq!(fresh.confidence, 0.55);
        assert_eq!(stale.confidence, 0.5);
    }

    #[test]
    fn unparseable_timestamp_degrades_to_not_recent() {
        let record = generator().generate_at(
            &item(
                "the weather stayed mild today",
                Source::Coindesk,
                Some("about an hour ago".to_string()),
            ),
            Utc::now(),
        );
        assert_eq!(record.confidence, 0.5);
    }

    #[test]
    fn confidence_never_exceeds_ceiling() {
        // Every boost fires at once, on top of maximal sentiment.
        let now = Utc::now();
        let article = item(
            "bitcoin rally surge breakout as fed and sec weigh inflation, cpi, gdp",
            Source::Coindesk,
            Some(now.to_rfc3339()),
        );
        let record = generator().generate_at(&article, now);
        assert!(record.confidence <= 0.95);
        assert!(record.confidence >= 0.0);
    }

    #[test]
    fn bounds_hold_across_term_mixes() {
        let generator = generator();
        let now = Utc::now();
        for bullish in 0..=4 {
            for bearish in 0..=4 {
                let mut words: Vec<&str> = lexicon::BULLISH[..bullish].to_vec();
                words.extend(&lexicon::BEARISH[..bearish]);
                let text = words.join(" ");
                for source in [Source::Coindesk, Source::Unknown] {
                    let record = generator.generate_at(
                        &item(&text, source, Some(now.to_rfc3339())),
                        now,
                    );
                    assert!(
                        (0.0..=0.95).contains(&record.confidence),
                        "{text:?} via {source}: {}",
                        record.confidence
                    );
                    assert!((-1.0..=1.0).contains(&record.sentiment_score));
                }
            }
        }
    }

    #[test]
    fn bare_timestamp_format_parses() {
        let now = Utc::now();
        let head = (now - Duration::minutes(10))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert!(is_recent(Some(&head), now));
    }
}
