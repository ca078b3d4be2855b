//! Raw text extraction, dispatched on file extension.
//!
//! [`ExtractorRegistry`] maps a lower-cased extension to an extractor
//! function. PDF and DOCX support sit behind the `pdf` and `docx` cargo
//! features; a build without one reports those files as
//! [`ExtractionFailure::MissingExtractor`] instead of failing the batch.

use std::{collections::HashMap, path::Path};

use crate::error::ExtractionFailure;

/// Extensions the tool knows how to read, given the right features.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md"];

/// Reads a file and returns its text.
pub type ExtractFn = fn(&Path) -> Result<String, ExtractionFailure>;

#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, ExtractFn>,
}

impl ExtractorRegistry {
    /// A registry with no extractors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plain text and Markdown, plus PDF and DOCX when their features are
    /// enabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register("txt", extract_plain_text)
            .register("md", extract_plain_text);
        #[cfg(feature = "pdf")]
        registry.register("pdf", extract_pdf);
        #[cfg(feature = "docx")]
        registry.register("docx", extract_docx);
        registry
    }

    pub fn register(
        &mut self,
        extension: &'static str,
        extractor: ExtractFn,
    ) -> &mut Self {
        self.extractors.insert(extension, extractor);
        self
    }

    /// Whether a file with this extension can be read.
    pub fn supports(&self, extension: &str) -> bool {
        self.extractors
            .contains_key(extension.to_ascii_lowercase().as_str())
    }

    /// Extract the text of `path`.
    ///
    /// Text that is empty after trimming is reported as
    /// [`ExtractionFailure::Empty`].
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let Some(extractor) = self.extractors.get(extension.as_str()) else {
            return Err(missing_or_unsupported(&extension));
        };

        let text = extractor(path)?;
        if text.trim().is_empty() {
            return Err(ExtractionFailure::Empty);
        }
        Ok(text)
    }
}

fn missing_or_unsupported(extension: &str) -> ExtractionFailure {
    match SUPPORTED_EXTENSIONS.iter().find(|known| **known == extension) {
        Some(known) => ExtractionFailure::MissingExtractor { extension: *known },
        None if extension.is_empty() => ExtractionFailure::Unsupported {
            extension: "(none)".to_string(),
        },
        None => ExtractionFailure::Unsupported {
            extension: format!(".{extension}"),
        },
    }
}

fn decode_error(
    format: &'static str,
    err: impl std::fmt::Display,
) -> ExtractionFailure {
    ExtractionFailure::Decode {
        format,
        message: err.to_string(),
    }
}

/// UTF-8 text and Markdown, read verbatim.
pub fn extract_plain_text(path: &Path) -> Result<String, ExtractionFailure> {
    let bytes = std::fs::read(path)?;
    let text =
        String::from_utf8(bytes).map_err(|err| decode_error("UTF-8", err))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Concatenated page text, one page per line block.
#[cfg(feature = "pdf")]
pub fn extract_pdf(path: &Path) -> Result<String, ExtractionFailure> {
    let decode = |err| decode_error("PDF", err);
    let mut doc = pdf_oxide::PdfDocument::open(path).map_err(decode)?;
    let page_count = doc.page_count().map_err(decode)?;

    let mut text = String::new();
    for page in 0..page_count {
        let page_text = doc.extract_text(page).map_err(decode)?;
        if !page_text.is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    Ok(text)
}

/// Paragraph text from `word/document.xml`, one paragraph per line.
#[cfg(feature = "docx")]
pub fn extract_docx(path: &Path) -> Result<String, ExtractionFailure> {
    use std::io::Read;

    let decode = |err| decode_error("DOCX", err);
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(decode)?;
    let mut entry = archive.by_name("word/document.xml").map_err(decode)?;

    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(document_xml_to_text(&xml))
}

/// Flatten WordprocessingML into text.
///
/// Keeps `<w:t>` run text, maps `<w:tab/>` to a tab, `<w:br/>` and
/// `<w:cr/>` to a newline, and ends each `<w:p>` paragraph with a newline.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut in_text = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text {
            out.push_str(&decode_entities(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            break;
        };
        let tag = &after[..close];
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();

        match name {
            "w:t" => in_text = !self_closing,
            "/w:t" => in_text = false,
            "w:tab" => out.push('\t'),
            "w:br" | "w:cr" => out.push('\n'),
            "/w:p" => out.push('\n'),
            _ => {}
        }
        rest = &after[close + 1..];
    }

    out
}

/// Decode the predefined XML entities and numeric character references.
/// Unknown entities are kept verbatim.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').and_then(|semi| {
            let entity = &after[..semi];
            let ch = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| {
                        entity.strip_prefix('#').and_then(|dec| dec.parse().ok())
                    })
                    .and_then(char::from_u32),
            };
            ch.map(|ch| (ch, semi))
        });

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_and_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        let txt = tmp.path().join("a.txt");
        let md = tmp.path().join("b.MD");
        std::fs::write(&txt, "---\nYear: 2020\n---").unwrap();
        std::fs::write(&md, "\u{feff}# Notes").unwrap();

        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.extract(&txt).unwrap(), "---\nYear: 2020\n---");
        assert_eq!(registry.extract(&md).unwrap(), "# Notes");
    }

    #[test]
    fn blank_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blank.txt");
        std::fs::write(&path, "  \n\t\n").unwrap();

        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(&path),
            Err(ExtractionFailure::Empty)
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let registry = ExtractorRegistry::with_defaults();
        let err = registry.extract(Path::new("figure.png")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: .png");

        let err = registry.extract(Path::new("Makefile")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: (none)");
    }

    #[test]
    fn known_extension_without_extractor_is_missing() {
        let registry = ExtractorRegistry::empty();
        assert!(matches!(
            registry.extract(Path::new("paper.pdf")),
            Err(ExtractionFailure::MissingExtractor { extension: "pdf" })
        ));
        assert!(!registry.supports("txt"));
    }

    #[test]
    fn missing_file_is_io_failure() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(Path::new("/nonexistent/litrev/a.txt")),
            Err(ExtractionFailure::Io(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_decode_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("latin1.txt");
        std::fs::write(&path, [0x66, 0x6f, 0xff, 0x6f]).unwrap();

        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(&path),
            Err(ExtractionFailure::Decode { format: "UTF-8", .. })
        ));
    }

    #[test]
    fn custom_extractor_can_be_registered() {
        fn shout(_: &Path) -> Result<String, ExtractionFailure> {
            Ok("---\nTitle: Custom\n---".to_string())
        }
        let mut registry = ExtractorRegistry::empty();
        registry.register("rtf", shout);
        assert!(registry.supports("RTF"));
        assert_eq!(
            registry.extract(Path::new("x.rtf")).unwrap(),
            "---\nTitle: Custom\n---"
        );
    }

    #[test]
    fn docx_xml_paragraphs_become_lines() {
        let xml = concat!(
            r#"<w:document><w:body>"#,
            r#"<w:p><w:r><w:t>---</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Title: </w:t></w:r>"#,
            r#"<w:r><w:t xml:space="preserve">Sleep &amp; Memory</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>---</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#,
        );
        assert_eq!(
            document_xml_to_text(xml),
            "---\nTitle: Sleep & Memory\nA\tB\nC\n---\n"
        );
    }

    #[test]
    fn docx_ignores_text_outside_runs() {
        let xml = "<w:p><w:pPr><w:pStyle w:val=\"Heading\"/></w:pPr>\
                   <w:instrText>IGNORED</w:instrText><w:t/><w:t>kept</w:t></w:p>";
        assert_eq!(document_xml_to_text(xml), "kept\n");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(
            decode_entities("&lt;a&gt; &quot;b&quot; &apos;c&apos; &#65;&#x42;"),
            "<a> \"b\" 'c' AB"
        );
        assert_eq!(decode_entities("fish & chips &bogus;"), "fish & chips &bogus;");
    }

    #[cfg(feature = "docx")]
    fn write_docx(path: &Path, entries: &[(&str, &str)]) {
        use std::io::Write;

        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[cfg(feature = "docx")]
    #[test]
    fn reads_docx_document_part() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("paper.docx");
        let xml = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document><w:body>"#,
            r#"<w:p><w:r><w:t>---</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Year: 2022</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Journal: Sleep &amp; Health</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>---</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Body.</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#,
        );
        write_docx(
            &path,
            &[
                ("[Content_Types].xml", "<Types/>"),
                ("word/document.xml", xml),
            ],
        );

        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(&path).unwrap();
        assert_eq!(
            text,
            "---\nYear: 2022\nJournal: Sleep & Health\n---\nBody.\n"
        );

        let meta = crate::header::parse_header(&text).unwrap();
        assert_eq!(meta["journal"], "Sleep & Health");
    }

    #[cfg(feature = "docx")]
    #[test]
    fn docx_without_document_part_is_decode_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hollow.docx");
        write_docx(&path, &[("word/styles.xml", "<w:styles/>")]);

        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(&path),
            Err(ExtractionFailure::Decode { format: "DOCX", .. })
        ));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn corrupt_docx_is_decode_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.docx");
        std::fs::write(&path, "not a zip archive").unwrap();

        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(&path),
            Err(ExtractionFailure::Decode { format: "DOCX", .. })
        ));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn corrupt_pdf_is_decode_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, "not a pdf").unwrap();

        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(
            registry.extract(&path),
            Err(ExtractionFailure::Decode { format: "PDF", .. })
        ));
    }
}
