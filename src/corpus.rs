use std::collections::HashMap;

use crate::{fields::DisplayField, header::Metadata};

/// An ingested document: its extracted text and the header parsed from it.
///
/// Records are immutable once built; a corpus only ever replaces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    id: String,
    raw_text: String,
    metadata: Metadata,
}

impl DocumentRecord {
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            metadata,
        }
    }

    /// Source identity, usually the file name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Value of a display field, or `""` when the header lacks it.
    pub fn field(&self, field: DisplayField) -> &str {
        self.metadata
            .get(field.key())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The twelve display values in column order.
    pub fn display_values(&self) -> [&str; 12] {
        DisplayField::ALL.map(|field| self.field(field))
    }

    /// Header entries that are not display fields.
    pub fn extra_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata
            .iter()
            .filter(|(key, _)| !DisplayField::is_display_key(key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// What [`Corpus::insert`] did with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Added,
    /// A record with the same id existed and was replaced in place.
    Replaced,
    /// No header was found; the document produces no row.
    NoMetadata,
}

/// The in-memory set of ingested documents, in insertion order.
///
/// Only documents with a header are held as records. Documents without one
/// are remembered by id so callers can report them, but they never take
/// part in queries.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    records: Vec<DocumentRecord>,
    positions: HashMap<String, usize>,
    without_metadata: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        self.records.clear();
        self.positions.clear();
        self.without_metadata.clear();
    }

    /// Add a document. `metadata` is `None` when no header was found.
    ///
    /// An id uniquely identifies at most one record: inserting an existing
    /// id replaces the earlier record (keeping its position), and inserting
    /// it without metadata removes the earlier record.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        raw_text: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Inserted {
        let id = id.into();
        let Some(metadata) = metadata else {
            self.remove(&id);
            if !self.without_metadata.contains(&id) {
                self.without_metadata.push(id);
            }
            return Inserted::NoMetadata;
        };

        self.without_metadata.retain(|other| *other != id);
        let record = DocumentRecord::new(id.clone(), raw_text, metadata);
        match self.positions.get(&id) {
            Some(&pos) => {
                self.records[pos] = record;
                Inserted::Replaced
            }
            None => {
                self.positions.insert(id, self.records.len());
                self.records.push(record);
                Inserted::Added
            }
        }
    }

    /// Records in insertion order.
    pub fn all(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    /// Ids of documents ingested without a header block.
    pub fn without_metadata(&self) -> &[String] {
        &self.without_metadata
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn remove(&mut self, id: &str) {
        let Some(pos) = self.positions.remove(id) else {
            return;
        };
        self.records.remove(pos);
        for later in self.positions.values_mut() {
            if *later > pos {
                *later -= 1;
            }
        }
    }
}
