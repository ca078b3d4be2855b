//! litrev - pull bibliographic header blocks out of papers and notes.
//!
//! Each document (PDF, DOCX, plain text, or Markdown) may carry a small
//! header of `key: value` lines between two `---` markers. litrev extracts
//! the text, parses that header, and keeps the results in an in-memory
//! [`Corpus`] that can be filtered by metadata or searched by full text and
//! exported as a delimited table.
//!
//! # Quick start
//!
//! ```
//! use litrev::{Corpus, QueryEngine, parse_header};
//!
//! let text = "---\nYear: 2021\nTitle: Sleep and memory\n---\nREM sleep ...";
//! let mut corpus = Corpus::new();
//! corpus.insert("sleep.md", text, parse_header(text));
//!
//! let engine = QueryEngine::new(&corpus);
//! assert_eq!(engine.filter_by_metadata("MEMORY").ids(), vec!["sleep.md"]);
//! assert_eq!(engine.filter_by_full_text("rem").unwrap().len(), 1);
//! ```

pub mod corpus;
pub mod error;
pub mod export;
pub mod extract;
pub mod fields;
pub mod header;
pub mod ingestion;
pub mod query;
pub mod render;
pub mod session;
pub mod shell;
pub mod text_util;
pub mod walker;

pub use corpus::{Corpus, DocumentRecord};
pub use error::{Error, ExtractionFailure, Result};
pub use extract::ExtractorRegistry;
pub use fields::DisplayField;
pub use header::{HeaderParser, Metadata, parse_header};
pub use ingestion::{IngestReport, Ingester};
pub use query::{ActiveFilter, QueryEngine, ResultSet};
pub use session::Session;
