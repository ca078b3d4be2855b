//! Delimited-table export of a result set.

use std::{io::Write, path::Path};

use crate::{
    corpus::DocumentRecord,
    error::{Error, Result},
    fields::DisplayField,
};

/// Label of the optional leading file-name column.
pub const FILE_COLUMN: &str = "File";

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Field separator byte, `,` by default.
    pub separator: u8,
    /// Prepend a column with each record's id.
    pub with_file: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            with_file: false,
        }
    }
}

/// Parse a `--separator` value: one ASCII character, or `tab` / `\t`.
pub fn parse_separator(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' => Ok(*byte),
            _ => Err(Error::Config(format!(
                "separator must be a single ASCII character other than '\"', got {value:?}"
            ))),
        },
    }
}

/// Write the header row and one row per record, returning the row count.
pub fn write_table<'a, W, I>(
    writer: W,
    records: I,
    options: ExportOptions,
) -> csv::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let mut out = csv::WriterBuilder::new()
        .delimiter(options.separator)
        .from_writer(writer);

    let labels = DisplayField::ALL.map(DisplayField::label);
    if options.with_file {
        out.write_record(std::iter::once(FILE_COLUMN).chain(labels))?;
    } else {
        out.write_record(labels)?;
    }

    let mut rows = 0;
    for record in records {
        let values = record.display_values();
        if options.with_file {
            out.write_record(std::iter::once(record.id()).chain(values))?;
        } else {
            out.write_record(values)?;
        }
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

/// Export `records` to a file at `path`.
///
/// Refuses with [`Error::NothingToExport`] when there are no records, so an
/// empty filter never clobbers an earlier export.
pub fn export_csv(
    path: &Path,
    records: &[&DocumentRecord],
    options: ExportOptions,
) -> Result<usize> {
    if records.is_empty() {
        return Err(Error::NothingToExport);
    }
    let export_err = |source: csv::Error| Error::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path)
        .map_err(|e| export_err(csv::Error::from(e)))?;
    write_table(std::io::BufWriter::new(file), records.iter().copied(), options)
        .map_err(export_err)
}
