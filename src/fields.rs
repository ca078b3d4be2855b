/// One of the twelve bibliographic columns shown in tables and exports.
///
/// The set is a display convention only: headers may carry any keys, and
/// missing fields render as empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    Year,
    AuthorCountry,
    Title,
    Journal,
    Abstract,
    Methodology,
    StrengthsLimitations,
    SampleSize,
    KeyFindings,
    Notes,
    Remarks,
    Citation,
}

impl DisplayField {
    /// All display fields in column order.
    pub const ALL: [DisplayField; 12] = [
        DisplayField::Year,
        DisplayField::AuthorCountry,
        DisplayField::Title,
        DisplayField::Journal,
        DisplayField::Abstract,
        DisplayField::Methodology,
        DisplayField::StrengthsLimitations,
        DisplayField::SampleSize,
        DisplayField::KeyFindings,
        DisplayField::Notes,
        DisplayField::Remarks,
        DisplayField::Citation,
    ];

    /// Normalized metadata key this field reads from.
    pub fn key(self) -> &'static str {
        match self {
            DisplayField::Year => "year",
            DisplayField::AuthorCountry => "author_country",
            DisplayField::Title => "title",
            DisplayField::Journal => "journal",
            DisplayField::Abstract => "abstract",
            DisplayField::Methodology => "methodology",
            DisplayField::StrengthsLimitations => "strengths_limitations",
            DisplayField::SampleSize => "sample_size",
            DisplayField::KeyFindings => "key_findings",
            DisplayField::Notes => "notes",
            DisplayField::Remarks => "remarks",
            DisplayField::Citation => "citation",
        }
    }

    /// Column header used in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            DisplayField::Year => "Year",
            DisplayField::AuthorCountry => "Author/Country",
            DisplayField::Title => "Title",
            DisplayField::Journal => "Journal",
            DisplayField::Abstract => "Abstract",
            DisplayField::Methodology => "Methodology",
            DisplayField::StrengthsLimitations => "Strengths/Limitations",
            DisplayField::SampleSize => "Sample Size",
            DisplayField::KeyFindings => "Key Findings",
            DisplayField::Notes => "Notes",
            DisplayField::Remarks => "Remarks",
            DisplayField::Citation => "Citation",
        }
    }

    /// Whether `key` names one of the display fields.
    pub fn is_display_key(key: &str) -> bool {
        Self::ALL.iter().any(|field| field.key() == key)
    }
}
