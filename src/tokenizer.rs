use crate::stopwords::StopWords;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

lazy_static::lazy_static! {
    // A single word character, or a word character run that may carry
    // inner apostrophes: "it's" stays whole, "well-known" splits.
    static ref WORD: Regex = Regex::new(r"\w[\w']*\w|\w").expect("valid regex");
}

/// Reduces a lowercase token to its root form
pub trait Stem: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Snowball English (Porter family) stemmer
pub struct SnowballStemmer {
    stemmer: Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Stem for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

/// Leaves tokens untouched
pub struct IdentityStemmer;

impl Stem for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Text normalization pipeline: tokenize, lowercase, drop stopwords, stem.
///
/// Documents and queries must go through the same `Tokenizer` or lookups
/// will miss.
pub struct Tokenizer {
    stopwords: StopWords,
    stemmer: Box<dyn Stem>,
}

impl Tokenizer {
    pub fn new(stopwords: StopWords) -> Self {
        Self::with_stemmer(stopwords, SnowballStemmer::english())
    }

    pub fn with_stemmer<S: Stem + 'static>(stopwords: StopWords, stemmer: S) -> Self {
        Self {
            stopwords,
            stemmer: Box::new(stemmer),
        }
    }

    /// Split text into raw word tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        WORD.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    /// Convert tokens to lowercase
    fn lowercase_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().map(|t| t.to_lowercase()).collect()
    }

    /// Remove stopwords, keeping the order of the survivors
    pub fn filter_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }

    /// Apply stemming
    fn stemmer_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().map(|t| self.stemmer.stem(&t)).collect()
    }

    /// Full analysis pipeline
    pub fn analyze(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let tokens = self.tokenize(text);
        let tokens = self.lowercase_filter(tokens);
        let tokens = self.filter_stopwords(tokens);
        self.stemmer_filter(tokens)
    }

    pub fn analyze_optional(&self, text: Option<&str>) -> Vec<String> {
        text.map(|t| self.analyze(t)).unwrap_or_default()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}
