use std::path::PathBuf;
use thiserror::Error;

/// Why a query produced nothing to intersect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The query normalized to zero tokens (empty, stopwords only, punctuation)
    NoTokens,
    /// The query had tokens, but none of them is in the index
    NoMatchingTerms,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTokens => write!(f, "query contains no searchable terms"),
            Self::NoMatchingTerms => write!(f, "no query term is present in the index"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("empty query result: {reason}")]
    EmptyQuery { reason: EmptyReason },

    #[error("failed to load stopwords from {path}")]
    Stopwords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt corpus: {0}")]
    Corpus(#[from] quick_xml::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn is_empty_query(&self) -> bool {
        matches!(self, Self::EmptyQuery { .. })
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
