//! Format detection.
//!
//! Detection order:
//!
//! 1. file extension (`.csv`, `.tsv`, `.json`, `.jsonl`), case-insensitive
//! 2. substring match on the declared content type (`csv`, `tab-separated-values`, `json`)
//! 3. otherwise an ordered fallback list: delimited text first, then JSON
//!
//! Nothing here reads the payload; content-based decisions belong to the strategies themselves.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Delimited text with a sniffed delimiter other than comma or tab.
    Delimited(u8),
    /// A JSON document, or JSON-Lines detected from content.
    Json,
    /// JSON-Lines: one JSON value per non-empty line.
    JsonLines,
}

impl IngestionFormat {
    /// Parse a format from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::JsonLines),
            _ => None,
        }
    }

    /// Match a declared content type by substring.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.to_ascii_lowercase();
        if ct.contains("csv") {
            Some(Self::Csv)
        } else if ct.contains("tab-separated-values") {
            Some(Self::Tsv)
        } else if ct.contains("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Field delimiter for delimited formats.
    pub fn delimiter(self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::Delimited(d) => Some(d),
            Self::Json | Self::JsonLines => None,
        }
    }

    /// Format for a delimited file using `delimiter`.
    pub fn for_delimiter(delimiter: u8) -> Self {
        match delimiter {
            b',' => Self::Csv,
            b'\t' => Self::Tsv,
            d => Self::Delimited(d),
        }
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Delimited(_) => "delimited",
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        }
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimited(d) => write!(f, "delimited({:?})", *d as char),
            other => f.write_str(other.name()),
        }
    }
}

impl Serialize for IngestionFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One parsing attempt in the ordered strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Parse with a known format.
    Format(IngestionFormat),
    /// Delimited text with the delimiter sniffed from content.
    SniffDelimited,
}

/// Detect a format from filename extension, then declared content type.
pub fn detect_format(filename: &str, content_type: Option<&str>) -> Option<IngestionFormat> {
    let by_extension = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .and_then(IngestionFormat::from_extension);

    by_extension.or_else(|| content_type.and_then(IngestionFormat::from_content_type))
}

/// Ordered list of strategies to try for an upload.
///
/// A detected format yields exactly one strategy. Otherwise delimited text is tried before JSON;
/// with `sniff_delimiter` off the delimited attempt is plain CSV.
pub fn candidate_strategies(
    filename: &str,
    content_type: Option<&str>,
    sniff_delimiter: bool,
) -> Vec<Strategy> {
    match detect_format(filename, content_type) {
        Some(fmt) => vec![Strategy::Format(fmt)],
        None => {
            let delimited = if sniff_delimiter {
                Strategy::SniffDelimited
            } else {
                Strategy::Format(IngestionFormat::Csv)
            };
            vec![delimited, Strategy::Format(IngestionFormat::Json)]
        }
    }
}
