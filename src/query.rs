//! Metadata and full-text filtering over a [`Corpus`].
//!
//! Both filters are plain case-insensitive substring matches with no
//! ranking: results always come back in corpus order. The two filters do
//! not compose; whichever ran last decides what is shown.

use std::fmt;

use crate::{
    corpus::{Corpus, DocumentRecord},
    error::{Error, Result},
};

/// Which filter produced the current set of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    All,
    Metadata(String),
    FullText(String),
}

impl ActiveFilter {
    /// Human-readable summary for a result set of `count` rows.
    pub fn status_line(&self, count: usize) -> String {
        match self {
            ActiveFilter::All => {
                format!("Loaded {count} files with metadata")
            }
            ActiveFilter::Metadata(_) => {
                format!("Found {count} matches in metadata")
            }
            ActiveFilter::FullText(query) => {
                format!("Found {count} documents containing '{query}'")
            }
        }
    }

    /// The full-text query, if that filter is active.
    pub fn full_text_query(&self) -> Option<&str> {
        match self {
            ActiveFilter::FullText(query) => Some(query),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveFilter::All => write!(f, "all rows"),
            ActiveFilter::Metadata(q) => write!(f, "metadata filter '{q}'"),
            ActiveFilter::FullText(q) => write!(f, "full-text search '{q}'"),
        }
    }
}

/// An ordered subset of a corpus.
#[derive(Debug, Clone)]
pub struct ResultSet<'c> {
    corpus: &'c Corpus,
    positions: Vec<usize>,
}

impl<'c> ResultSet<'c> {
    /// Rebuild a result set from positions previously taken from one.
    ///
    /// Positions past the end of the corpus are dropped.
    pub fn from_positions(corpus: &'c Corpus, positions: &[usize]) -> Self {
        let positions = positions
            .iter()
            .copied()
            .filter(|&pos| pos < corpus.len())
            .collect();
        Self { corpus, positions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'c DocumentRecord> + '_ {
        let records = self.corpus.all();
        self.positions.iter().map(move |&pos| &records[pos])
    }

    pub fn records(&self) -> Vec<&'c DocumentRecord> {
        self.iter().collect()
    }

    pub fn ids(&self) -> Vec<&'c str> {
        self.iter().map(DocumentRecord::id).collect()
    }

    pub fn into_positions(self) -> Vec<usize> {
        self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Read-only queries over a corpus.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'c> {
    corpus: &'c Corpus,
}

impl<'c> QueryEngine<'c> {
    pub fn new(corpus: &'c Corpus) -> Self {
        Self { corpus }
    }

    /// Every record, in corpus order.
    pub fn all(&self) -> ResultSet<'c> {
        self.select(|_| true)
    }

    /// Records whose display fields contain `query`, ignoring case.
    ///
    /// The display values are joined with single spaces in column order, so
    /// a query may span adjacent fields. An empty query returns everything.
    pub fn filter_by_metadata(&self, query: &str) -> ResultSet<'c> {
        if query.is_empty() {
            return self.all();
        }
        let needle = query.to_lowercase();
        self.select(|record| metadata_haystack(record).contains(&needle))
    }

    /// Records whose raw text contains `query`, ignoring case.
    ///
    /// An empty query is rejected with [`Error::EmptyQuery`].
    pub fn filter_by_full_text(&self, query: &str) -> Result<ResultSet<'c>> {
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let needle = query.to_lowercase();
        Ok(self.select(|record| {
            record.raw_text().to_lowercase().contains(&needle)
        }))
    }

    fn select(
        &self,
        mut keep: impl FnMut(&DocumentRecord) -> bool,
    ) -> ResultSet<'c> {
        let positions = self
            .corpus
            .all()
            .iter()
            .enumerate()
            .filter(|(_, record)| keep(record))
            .map(|(pos, _)| pos)
            .collect();
        ResultSet {
            corpus: self.corpus,
            positions,
        }
    }
}

fn metadata_haystack(record: &DocumentRecord) -> String {
    record.display_values().join(" ").to_lowercase()
}
