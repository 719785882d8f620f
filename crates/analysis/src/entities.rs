use regex::RegexBuilder;

/// Tracked assets and their surface forms (canonical name plus common
/// abbreviation or ticker). Word-boundary matching keeps tickers like
/// "sol" or "ada" from firing inside unrelated words.
const ENTITY_PATTERNS: &[(&str, &str)] = &[
    ("BITCOIN", r"\b(bitcoin|btc)\b"),
    ("ETHEREUM", r"\b(ethereum|eth|ether)\b"),
    ("SOLANA", r"\b(solana|sol)\b"),
    ("CARDANO", r"\b(cardano|ada)\b"),
    ("POLYGON", r"\b(polygon|matic)\b"),
    ("CHAINLINK", r"\b(chainlink|link)\b"),
    ("AVALANCHE", r"\b(avalanche|avax)\b"),
    ("DOGECOIN", r"\b(dogecoin|doge)\b"),
    ("XRP", r"\b(xrp|ripple)\b"),
    ("BINANCE", r"\b(binance|bnb)\b"),
    ("LITECOIN", r"\b(litecoin|ltc)\b"),
    ("POLKADOT", r"\b(polkadot|dot)\b"),
];

/// Detects which tracked assets a piece of text references.
pub struct EntityExtractor {
    patterns: Vec<(&'static str, regex::Regex)>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        let patterns = ENTITY_PATTERNS
            .iter()
            .map(|(entity, pattern)| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("static entity pattern must compile");
                (*entity, regex)
            })
            .collect();
        Self { patterns }
    }

    /// Returns the deduplicated set of mentioned entity identifiers.
    /// Untracked assets are silently ignored.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(entity, _)| entity.to_string())
            .collect()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
