pub mod config;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod shell;
pub mod stopwords;
pub mod tokenizer;

// Re-export commonly used types
pub use config::Config;
pub use corpus::{Corpus, FileCorpus};
pub use document::{DocId, Document};
pub use engine::{index_all, IndexReport, MatchMode, QueryEngine, SearchEngine};
pub use error::{EmptyReason, Result, SearchError};
pub use index::{IndexStats, InvertedIndex};
pub use shell::Shell;
pub use stopwords::StopWords;
pub use tokenizer::{IdentityStemmer, SnowballStemmer, Stem, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
