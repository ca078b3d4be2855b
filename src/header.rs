//! Extraction of the delimited `key: value` header block embedded in a
//! document's text.
//!
//! A header is the span between the first two occurrences of the delimiter
//! marker (by default `---`):
//!
//! ```text
//! ---
//! Year: 2021
//! Title: "Sleep and memory: a review"
//! Author Country: Smith / UK
//! ---
//! Body text is ignored by the parser.
//! ```
//!
//! The marker is matched as a plain substring, so text extracted from PDFs
//! where line breaks around the marker were lost still parses.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Header delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = "---";

/// Parsed header fields, keyed by normalized field name.
pub type Metadata = BTreeMap<String, String>;

/// Parses header blocks delimited by a configurable marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParser {
    delimiter: String,
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl HeaderParser {
    /// Create a parser for a custom delimiter marker.
    ///
    /// Returns [`Error::Config`] if the marker is empty or only whitespace.
    pub fn new(delimiter: impl Into<String>) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.trim().is_empty() {
            return Err(Error::Config(
                "header delimiter must not be empty".into(),
            ));
        }
        Ok(Self { delimiter })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Parse the header block out of `text`.
    ///
    /// Returns `None` when the delimiter does not occur twice. A header that
    /// is present but has no `key: value` lines yields `Some` of an empty
    /// map, which callers must keep distinct from `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use litrev::header::HeaderParser;
    ///
    /// let parser = HeaderParser::default();
    /// let meta = parser.parse("---\nTitle: \"Foo: Bar\"\n---").unwrap();
    /// assert_eq!(meta["title"], "Foo: Bar");
    ///
    /// assert!(parser.parse("no header here").is_none());
    /// assert!(parser.parse("---\n---").unwrap().is_empty());
    /// ```
    pub fn parse(&self, text: &str) -> Option<Metadata> {
        let body = self.header_body(text)?;

        let mut metadata = Metadata::new();
        for line in body.lines() {
            let Some((raw_key, raw_value)) = line.split_once(':') else {
                continue;
            };
            let key = normalize_key(raw_key);
            if key.is_empty() {
                continue;
            }
            // Later duplicates overwrite earlier ones.
            metadata.insert(key, strip_quotes(raw_value.trim()).to_string());
        }
        Some(metadata)
    }

    /// The text strictly between the first and second delimiter.
    fn header_body<'a>(&self, text: &'a str) -> Option<&'a str> {
        let open = text.find(&self.delimiter)?;
        let after_open = &text[open + self.delimiter.len()..];
        let close = after_open.find(&self.delimiter)?;
        Some(&after_open[..close])
    }
}

/// Parse a header using the default `---` delimiter.
pub fn parse_header(text: &str) -> Option<Metadata> {
    HeaderParser::default().parse(text)
}

/// Trim, lower-case, and collapse whitespace runs into single underscores.
fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Strip one layer of matching `"` or `'` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_basic_header() {
        let text = "---\nYear: 2020\nTitle: Sleep\n---\nBody text";
        assert_eq!(
            parse_header(text),
            Some(meta(&[("year", "2020"), ("title", "Sleep")]))
        );
    }

    #[test]
    fn value_keeps_colons_after_the_first() {
        let text = "---\nTitle: \"Foo: Bar\"\n---";
        assert_eq!(parse_header(text), Some(meta(&[("title", "Foo: Bar")])));
    }

    #[test]
    fn last_duplicate_wins() {
        let text = "---\nYear: 2020\nYear: 2021\n---";
        assert_eq!(parse_header(text), Some(meta(&[("year", "2021")])));
    }

    #[test]
    fn key_whitespace_becomes_underscore() {
        let text = "---\n  Key   Findings :  fewer errors \nSample\tSize: 40\n---";
        assert_eq!(
            parse_header(text),
            Some(meta(&[
                ("key_findings", "fewer errors"),
                ("sample_size", "40"),
            ]))
        );
    }

    #[test]
    fn strips_single_layer_of_matching_quotes() {
        let text = "---\na: 'single'\nb: \"\"double\"\"\nc: \"mismatch'\nd: \"\n---";
        assert_eq!(
            parse_header(text),
            Some(meta(&[
                ("a", "single"),
                ("b", "\"double\""),
                ("c", "\"mismatch'"),
                ("d", "\""),
            ]))
        );
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let text = "---\njust a note\nYear: 1999\n---";
        assert_eq!(parse_header(text), Some(meta(&[("year", "1999")])));
    }

    #[test]
    fn empty_key_is_skipped() {
        let text = "---\n: orphan value\nYear: 1999\n---";
        assert_eq!(parse_header(text), Some(meta(&[("year", "1999")])));
    }

    #[test]
    fn empty_header_is_present_but_empty() {
        assert_eq!(parse_header("---\n---"), Some(Metadata::new()));
        assert_eq!(parse_header("------"), Some(Metadata::new()));
        assert_eq!(
            parse_header("---\nno colons here\n---"),
            Some(Metadata::new())
        );
    }

    #[test]
    fn single_delimiter_is_absent() {
        assert_eq!(parse_header("---\nYear: 2020\n"), None);
        assert_eq!(parse_header("Year: 2020"), None);
        assert_eq!(parse_header(""), None);
    }

    #[test]
    fn only_first_block_is_used() {
        let text = "intro\n---\nYear: 2020\n---\nmiddle\n---\nYear: 1900\n---";
        assert_eq!(parse_header(text), Some(meta(&[("year", "2020")])));
    }

    #[test]
    fn delimiter_inside_a_line_counts() {
        let text = "Header --- Year: 2020 --- trailing";
        assert_eq!(parse_header(text), Some(meta(&[("year", "2020")])));
    }

    #[test]
    fn unknown_keys_are_kept() {
        let text = "---\nDOI: 10.1000/xyz\nYear: 2020\n---";
        let parsed = parse_header(text).unwrap();
        assert_eq!(parsed["doi"], "10.1000/xyz");
    }

    #[test]
    fn windows_line_endings() {
        let text = "---\r\nYear: 2020\r\nTitle: Sleep\r\n---\r\n";
        assert_eq!(
            parse_header(text),
            Some(meta(&[("year", "2020"), ("title", "Sleep")]))
        );
    }

    #[test]
    fn custom_delimiter() {
        let parser = HeaderParser::new("+++").unwrap();
        let text = "---\nignored: yes\n---\n+++\nYear: 2001\n+++";
        assert_eq!(parser.parse(text), Some(meta(&[("year", "2001")])));
        assert_eq!(parser.delimiter(), "+++");
    }

    #[test]
    fn empty_delimiter_is_rejected() {
        assert!(matches!(HeaderParser::new(""), Err(Error::Config(_))));
        assert!(matches!(HeaderParser::new("  "), Err(Error::Config(_))));
    }

    proptest! {
        #[test]
        fn second_block_is_ignored(
            a in "[a-zA-Z0-9 :\n\"']{0,60}",
            b in "[a-zA-Z0-9 :\n\"']{0,60}",
        ) {
            let first = parse_header(&format!("---{a}---"));
            let both = parse_header(&format!("---{a}---{b}---"));
            prop_assert!(first.is_some());
            prop_assert_eq!(first, both);
        }

        #[test]
        fn parsing_is_idempotent(text in "[a-zA-Z0-9 :\n\"'-]{0,120}") {
            prop_assert_eq!(parse_header(&text), parse_header(&text));
        }

        #[test]
        fn fewer_than_two_delimiters_is_absent(
            text in "[a-zA-Z0-9 :\n-]{0,80}",
        ) {
            prop_assume!(text.matches(DEFAULT_DELIMITER).count() < 2);
            prop_assert_eq!(parse_header(&text), None);
        }
    }
}
