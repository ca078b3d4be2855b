use std::path::Path;

use crate::{
    corpus::{Corpus, DocumentRecord},
    error::Result,
    export::{self, ExportOptions},
    extract::ExtractorRegistry,
    header::HeaderParser,
    ingestion::{IngestReport, Ingester},
    query::{ActiveFilter, QueryEngine, ResultSet},
};

/// Application state for one user: the loaded corpus and the rows
/// currently shown.
///
/// Every load replaces the corpus wholesale and resets the view to all
/// rows. Each filter replaces the view; filters never combine.
#[derive(Debug, Default)]
pub struct Session {
    registry: ExtractorRegistry,
    parser: HeaderParser,
    corpus: Corpus,
    view: Vec<usize>,
    active: ActiveFilter,
}

impl Session {
    pub fn new(registry: ExtractorRegistry, parser: HeaderParser) -> Self {
        Self {
            registry,
            parser,
            ..Self::default()
        }
    }

    /// Replace the corpus with the documents at `paths`.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> IngestReport {
        let ingester = Ingester::new(&self.registry, &self.parser);
        let (corpus, report) = ingester.build(paths);
        self.corpus = corpus;
        self.active = ActiveFilter::All;
        self.view = QueryEngine::new(&self.corpus).all().into_positions();
        report
    }

    /// Show records whose display fields contain `query`. An empty query
    /// shows everything.
    pub fn filter_metadata(&mut self, query: &str) -> ResultSet<'_> {
        self.view = QueryEngine::new(&self.corpus)
            .filter_by_metadata(query)
            .into_positions();
        self.active = if query.is_empty() {
            ActiveFilter::All
        } else {
            ActiveFilter::Metadata(query.to_string())
        };
        self.current()
    }

    /// Show records whose text contains `query`.
    ///
    /// An empty query is rejected and the current view is left unchanged.
    pub fn search_full_text(&mut self, query: &str) -> Result<ResultSet<'_>> {
        self.view = QueryEngine::new(&self.corpus)
            .filter_by_full_text(query)?
            .into_positions();
        self.active = ActiveFilter::FullText(query.to_string());
        Ok(self.current())
    }

    /// The rows produced by the last load or filter.
    pub fn current(&self) -> ResultSet<'_> {
        ResultSet::from_positions(&self.corpus, &self.view)
    }

    pub fn active_filter(&self) -> &ActiveFilter {
        &self.active
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Write the current rows to `path`, returning how many were written.
    pub fn export(&self, path: &Path, options: ExportOptions) -> Result<usize> {
        let records: Vec<&DocumentRecord> = self.current().records();
        export::export_csv(path, &records, options)
    }
}
