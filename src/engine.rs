use crate::document::{DocId, Document};
use crate::error::{EmptyReason, Result, SearchError};
use crate::index::{IndexStats, InvertedIndex};
use crate::tokenizer::Tokenizer;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

const PROGRESS_EVERY: usize = 10_000;

/// How query terms missing from the index are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Unknown terms are skipped; the remaining terms are intersected
    #[default]
    Lenient,
    /// An unknown term matches nothing, so the whole query matches nothing.
    /// A query with no known term at all is still an empty-query error.
    Strict,
}

/// Summary of one indexing pass
#[derive(Debug, Clone, Copy)]
pub struct IndexReport {
    pub documents: usize,
    pub elapsed: Duration,
}

/// Populate `index` from `documents`, in iteration order.
///
/// Each document's tokens are all added before moving on to the next one,
/// which is what keeps a document id from appearing twice in a posting list.
/// Running this twice over the same documents against the same index
/// appends every id again (except for the last document's).
pub fn index_all<'a, I>(index: &mut InvertedIndex, tokenizer: &Tokenizer, documents: I) -> IndexReport
where
    I: IntoIterator<Item = &'a Document>,
{
    let start = Instant::now();
    let mut count = 0;

    for doc in documents {
        for token in tokenizer.analyze(doc.text()) {
            index.add_posting(&token, doc.id);
        }

        count += 1;
        if count % PROGRESS_EVERY == 0 {
            tracing::debug!("Indexed {} documents", count);
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        "Indexed {} documents ({} tokens) in {:?}",
        count,
        index.len(),
        elapsed
    );

    IndexReport {
        documents: count,
        elapsed,
    }
}

/// Read-only conjunctive search over an index
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
    tokenizer: &'a Tokenizer,
    mode: MatchMode,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex, tokenizer: &'a Tokenizer) -> Self {
        Self {
            index,
            tokenizer,
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// One id set per analyzed query term found in the index.
    ///
    /// In strict mode an unknown term adds an empty set, but only when at
    /// least one other term was found; a query with no known term yields
    /// no sets in either mode.
    pub fn search(&self, text: &str) -> Vec<HashSet<DocId>> {
        self.lookup_all(&self.tokenizer.analyze(text))
    }

    fn lookup_all(&self, tokens: &[String]) -> Vec<HashSet<DocId>> {
        let mut sets = Vec::with_capacity(tokens.len());
        let mut found = 0;
        for token in tokens {
            match self.index.lookup(token) {
                Some(ids) => {
                    found += 1;
                    sets.push(ids.iter().copied().collect());
                }
                None if self.mode == MatchMode::Strict => sets.push(HashSet::new()),
                None => tracing::trace!("Skipping unknown term {:?}", token),
            }
        }

        if found == 0 {
            sets.clear();
        }
        sets
    }

    /// Intersect the sets produced by [`search`](Self::search).
    ///
    /// Intersecting zero sets is an error, never an empty result.
    pub fn resolve(&self, sets: Vec<HashSet<DocId>>) -> Result<HashSet<DocId>> {
        let mut sets = sets.into_iter();
        let first = sets.next().ok_or(SearchError::EmptyQuery {
            reason: EmptyReason::NoMatchingTerms,
        })?;

        Ok(sets.fold(first, |mut acc, set| {
            acc.retain(|id| set.contains(id));
            acc
        }))
    }

    /// `search` followed by `resolve`, telling apart a query with no terms
    /// from one whose terms are all unknown
    pub fn query(&self, text: &str) -> Result<HashSet<DocId>> {
        let tokens = self.tokenizer.analyze(text);
        if tokens.is_empty() {
            return Err(SearchError::EmptyQuery {
                reason: EmptyReason::NoTokens,
            });
        }

        self.resolve(self.lookup_all(&tokens))
    }
}

/// One indexing + query session: owns the tokenizer, the documents and
/// the index built over them
pub struct SearchEngine {
    tokenizer: Tokenizer,
    index: InvertedIndex,
    documents: HashMap<DocId, Document>,
    mode: MatchMode,
}

impl SearchEngine {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            index: InvertedIndex::new(),
            documents: HashMap::new(),
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the session contents with `documents` and index them into
    /// a fresh index
    pub fn index_documents<I>(&mut self, documents: I) -> IndexReport
    where
        I: IntoIterator<Item = Document>,
    {
        let documents: Vec<Document> = documents.into_iter().collect();

        let mut index = InvertedIndex::new();
        let report = index_all(&mut index, &self.tokenizer, &documents);

        self.index = index;
        self.documents = documents.into_iter().map(|d| (d.id, d)).collect();
        report
    }

    /// Like [`index_documents`](Self::index_documents) for a fallible
    /// stream. Nothing is replaced if the stream fails.
    pub fn try_index_documents<I>(&mut self, documents: I) -> Result<IndexReport>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let documents = documents.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(self.index_documents(documents))
    }

    pub fn query_engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.index, &self.tokenizer).with_mode(self.mode)
    }

    /// Matching document ids, ascending
    pub fn search_ids(&self, text: &str) -> Result<Vec<DocId>> {
        let mut ids: Vec<DocId> = self.query_engine().query(text)?.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Matching documents, ascending by id
    pub fn search(&self, text: &str) -> Result<Vec<&Document>> {
        let start = Instant::now();
        let documents: Vec<&Document> = self
            .search_ids(text)?
            .into_iter()
            .filter_map(|id| self.documents.get(&id))
            .collect();

        tracing::info!(
            "Search for {:?} found {} documents in {:?}",
            text,
            documents.len(),
            start.elapsed()
        );
        Ok(documents)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}
