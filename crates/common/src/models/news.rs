use std::fmt;

use serde::{Deserialize, Serialize};

/// One news article as delivered by the feed collaborator.
/// Immutable once fetched; the URL is its identity key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: Source,
    /// Raw publication timestamp as the feed reported it. A missing or
    /// unparseable value means "unknown, not recent".
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Known news outlets. Anything else maps to `Unknown`, which carries
/// the lowest reliability weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Coindesk,
    Cointelegraph,
    Cryptonews,
    BitcoinCom,
    Decrypt,
    Bitcoinist,
    Cryptoslate,
    #[serde(other)]
    Unknown,
}

impl Source {
    pub fn from_name(name: &str) -> Self {
        match name {
            "coindesk" => Self::Coindesk,
            "cointelegraph" => Self::Cointelegraph,
            "cryptonews" => Self::Cryptonews,
            "bitcoin_com" => Self::BitcoinCom,
            "decrypt" => Self::Decrypt,
            "bitcoinist" => Self::Bitcoinist,
            "cryptoslate" => Self::Cryptoslate,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coindesk => "coindesk",
            Self::Cointelegraph => "cointelegraph",
            Self::Cryptonews => "cryptonews",
            Self::BitcoinCom => "bitcoin_com",
            Self::Decrypt => "decrypt",
            Self::Bitcoinist => "bitcoinist",
            Self::Cryptoslate => "cryptoslate",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
