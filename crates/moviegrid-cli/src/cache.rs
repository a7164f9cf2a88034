//! Session search cache.

use std::collections::HashMap;
use std::fmt;

use moviegrid_api::catalog::SearchResult;

/// Identifies one effective query: the trimmed query text plus the
/// optional genre filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Trimmed query text.
    pub query: String,
    /// Genre filter (`with_genres`).
    pub genre: Option<u32>,
}

impl CacheKey {
    /// Creates a key.
    pub fn new(query: impl Into<String>, genre: Option<u32>) -> Self {
        Self {
            query: query.into(),
            genre,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.genre {
            Some(genre) => write!(f, "{:?} (genre {genre})", self.query),
            None => write!(f, "{:?}", self.query),
        }
    }
}

/// Results of earlier queries, kept for the whole session.
///
/// No eviction and no size bound: a session issues a few dozen queries
/// at most.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchCache {
    entries: HashMap<CacheKey, SearchResult>,
}

impl SearchCache {
    /// Returns the cached result for `key`.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<&SearchResult> {
        self.entries.get(key)
    }

    /// Stores `result` under `key`, replacing any previous entry.
    pub fn set(&mut self, key: CacheKey, result: SearchResult) {
        self.entries.insert(key, result);
    }

    /// Number of cached queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
