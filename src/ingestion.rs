use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    corpus::{Corpus, Inserted},
    error::ExtractionFailure,
    extract::ExtractorRegistry,
    header::HeaderParser,
};

/// A file that produced no text, and why.
#[derive(Debug, thiserror::Error)]
#[error("{}: {failure}", path.display())]
pub struct FileFailure {
    pub path: PathBuf,
    #[source]
    pub failure: ExtractionFailure,
}

/// Outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Files whose text was extracted.
    pub success_count: usize,
    /// Files skipped because extraction failed or produced no text.
    pub skipped_count: usize,
    /// Records in the resulting corpus.
    pub rows_with_metadata: usize,
    /// Ids of extracted files that had no header block.
    pub no_metadata: Vec<String>,
    pub failures: Vec<FileFailure>,
}

/// Identifier used for a file in the corpus: its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs files through extraction and header parsing into a corpus.
pub struct Ingester<'a> {
    registry: &'a ExtractorRegistry,
    parser: &'a HeaderParser,
}

impl<'a> Ingester<'a> {
    pub fn new(registry: &'a ExtractorRegistry, parser: &'a HeaderParser) -> Self {
        Self { registry, parser }
    }

    /// Build a fresh corpus from `paths`, processed strictly in order.
    ///
    /// A file that fails extraction is recorded in the report and skipped;
    /// it never aborts the rest of the batch.
    pub fn build<P: AsRef<Path>>(&self, paths: &[P]) -> (Corpus, IngestReport) {
        let mut corpus = Corpus::new();
        let mut report = IngestReport::default();

        for path in paths {
            let path = path.as_ref();
            let text = match self.registry.extract(path) {
                Ok(text) => text,
                Err(failure) => {
                    warn!("skipping {}: {failure}", path.display());
                    report.skipped_count += 1;
                    report.failures.push(FileFailure {
                        path: path.to_path_buf(),
                        failure,
                    });
                    continue;
                }
            };
            report.success_count += 1;

            let id = document_id(path);
            let metadata = self.parser.parse(&text);
            match corpus.insert(id.clone(), text, metadata) {
                Inserted::Added => debug!("ingested {id}"),
                Inserted::Replaced => {
                    warn!("{id} appears more than once; keeping the later file")
                }
                Inserted::NoMetadata => info!("no metadata found in {id}"),
            }
        }

        report.rows_with_metadata = corpus.len();
        report.no_metadata = corpus.without_metadata().to_vec();
        info!(
            "ingested {} of {} files ({} with metadata, {} skipped)",
            report.success_count,
            paths.len(),
            report.rows_with_metadata,
            report.skipped_count
        );
        (corpus, report)
    }

    /// Replace the contents of `corpus` with the documents in `paths`.
    ///
    /// The new corpus is built separately and swapped in at the end, so the
    /// previous contents stay intact until the batch is complete.
    pub fn ingest_into<P: AsRef<Path>>(
        &self,
        corpus: &mut Corpus,
        paths: &[P],
    ) -> IngestReport {
        let (fresh, report) = self.build(paths);
        *corpus = fresh;
        report
    }
}
