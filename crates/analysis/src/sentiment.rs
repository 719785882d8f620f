//! Keyword-presence sentiment scoring.

use crate::lexicon;

/// Result of scoring one piece of text against the lexicon.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBreakdown {
    /// In [-1, 1] by construction; 0.0 when nothing matched.
    pub score: f64,
    pub bullish: Vec<String>,
    pub bearish: Vec<String>,
}

/// Scores `text` as `(bullish - bearish) / (bullish + bearish)` over
/// matched lexicon terms. Each term counts at most once no matter how
/// often it repeats. Empty or unmatched text scores 0 with empty
/// match lists; malformed input never fails.
pub fn score(text: &str) -> SentimentBreakdown {
    let text = text.to_lowercase();

    let bullish = present_terms(&text, lexicon::BULLISH);
    let bearish = present_terms(&text, lexicon::BEARISH);

    let total = bullish.len() + bearish.len();
    let score = if total == 0 {
        0.0
    } else {
        (bullish.len() as f64 - bearish.len() as f64) / total as f64
    };

    SentimentBreakdown {
        score,
        bullish,
        bearish,
    }
}

/// Macro/regulatory terms present in `text`, in lexicon order.
pub fn high_impact(text: &str) -> Vec<String> {
    present_terms(&text.to_lowercase(), lexicon::HIGH_IMPACT)
}

fn present_terms(text: &str, terms: &[&str]) -> Vec<String> {
    terms
        .iter()
        .filter(|term| text.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matches_scores_zero() {
        let breakdown = score("the weather stayed mild over the weekend");
        assert_eq!(breakdown.score, 0.0);
        assert!(breakdown.bullish.is_empty());
        assert!(breakdown.bearish.is_empty());
    }

    #[test]
    fn empty_text_behaves_like_no_matches() {
        assert_eq!(score(""), score("nothing relevant here"));
    }

    #[test]
    fn purely_bullish_text_scores_one() {
        let breakdown = score("Massive rally and surge after ETF approval");
        assert_eq!(breakdown.score, 1.0);
        assert_eq!(breakdown.bullish, vec!["rally", "surge", "approval", "etf"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>());
        assert!(breakdown.bearish.is_empty());
    }

    #[test]
    fn mixed_text_scores_fractionally() {
        // 3 bullish (rally, surge, breakout) vs 2 bearish (crash, dump)
        let breakdown = score("rally surge breakout despite crash and dump");
        assert_eq!(breakdown.score, 0.2);
    }

    #[test]
    fn repetition_counts_once() {
        let once = score("pump");
        let many = score("pump pump pump pump");
        assert_eq!(once.score, many.score);
        assert_eq!(many.bullish.len(), 1);
    }

    #[test]
    fn score_is_bounded() {
        for text in [
            "rally",
            "crash",
            "rally crash",
            "surge surge dump plunge fear hack",
        ] {
            let s = score(text).score;
            assert!((-1.0..=1.0).contains(&s), "{text}: {s}");
        }
    }

    #[test]
    fn high_impact_matches_macro_terms() {
        let matches = high_impact("Fed weighs interest rate cut as inflation cools");
        assert_eq!(matches, vec!["fed", "interest rate", "inflation"]);
    }
}
