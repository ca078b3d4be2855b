//! Rendering result sets for the terminal.

use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use serde::Serialize;

use crate::{
    corpus::DocumentRecord,
    export::{self, ExportOptions},
    fields::DisplayField,
    query::ActiveFilter,
    text_util,
};

/// Output format for `scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One block per document with its non-empty fields
    #[default]
    Table,
    /// A JSON object with every row
    Json,
    /// A delimited table with the display columns
    Csv,
}

/// Human-readable listing: the id, then each non-empty display field.
///
/// For full-text results the first matching line is shown as well.
pub fn write_human<W: Write>(
    out: &mut W,
    records: &[&DocumentRecord],
    active: &ActiveFilter,
) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "No matching documents.")?;
        return Ok(());
    }

    for (rank, record) in records.iter().enumerate() {
        writeln!(out, "{:>3}. {}", rank + 1, record.id())?;
        for field in DisplayField::ALL {
            let value = record.field(field);
            if !value.is_empty() {
                writeln!(out, "     {}: {}", field.label(), value)?;
            }
        }
        if let Some(query) = active.full_text_query()
            && let Some((line, snippet)) =
                text_util::matching_line(record.raw_text(), query)
        {
            writeln!(out, "     > line {line}: {snippet}")?;
        }
    }
    writeln!(out, "\n{} document(s)", records.len())
}

/// JSON document with the active filter and every row.
pub fn write_json<W: Write>(
    out: &mut W,
    records: &[&DocumentRecord],
    active: &ActiveFilter,
) -> crate::Result<()> {
    let response = JsonResponse::new(records, active);
    serde_json::to_writer_pretty(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

/// Delimited table on any writer.
pub fn write_csv<W: Write>(
    out: &mut W,
    records: &[&DocumentRecord],
    options: ExportOptions,
) -> crate::Result<()> {
    export::write_table(out, records.iter().copied(), options).map_err(
        |e| match e.into_kind() {
            csv::ErrorKind::Io(io) => crate::Error::Io(io),
            other => crate::Error::Config(format!("CSV output failed: {other:?}")),
        },
    )?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonResponse<'a> {
    filter: &'static str,
    query: Option<&'a str>,
    result_count: usize,
    results: Vec<JsonRow<'a>>,
}

impl<'a> JsonResponse<'a> {
    fn new(records: &[&'a DocumentRecord], active: &'a ActiveFilter) -> Self {
        let (filter, query) = match active {
            ActiveFilter::All => ("all", None),
            ActiveFilter::Metadata(q) => ("metadata", Some(q.as_str())),
            ActiveFilter::FullText(q) => ("fulltext", Some(q.as_str())),
        };
        Self {
            filter,
            query,
            result_count: records.len(),
            results: records.iter().copied().map(JsonRow::new).collect(),
        }
    }
}

/// A row as an object: `id`, the display fields in column order, then any
/// other header keys under `extra`.
#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    year: &'a str,
    author_country: &'a str,
    title: &'a str,
    journal: &'a str,
    #[serde(rename = "abstract")]
    abstract_: &'a str,
    methodology: &'a str,
    strengths_limitations: &'a str,
    sample_size: &'a str,
    key_findings: &'a str,
    notes: &'a str,
    remarks: &'a str,
    citation: &'a str,
    extra: BTreeMap<&'a str, &'a str>,
}

impl<'a> JsonRow<'a> {
    fn new(record: &'a DocumentRecord) -> Self {
        let [
            year,
            author_country,
            title,
            journal,
            abstract_,
            methodology,
            strengths_limitations,
            sample_size,
            key_findings,
            notes,
            remarks,
            citation,
        ] = record.display_values();
        Self {
            id: record.id(),
            year,
            author_country,
            title,
            journal,
            abstract_,
            methodology,
            strengths_limitations,
            sample_size,
            key_findings,
            notes,
            remarks,
            citation,
            extra: record.extra_fields().collect(),
        }
    }
}
