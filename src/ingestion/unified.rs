//! Unified ingestion entrypoint.
//!
//! Most callers should use [`parse_records`], which turns an uploaded byte buffer into a
//! [`crate::types::RecordSet`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is detected from the filename and
//!   declared content type, falling back to an ordered list of strategies
//!   (see [`super::detect::candidate_strategies`]).
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult, ParseFailure};
use crate::types::{RecordSet, Row};

use super::detect::{candidate_strategies, Strategy};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{delimited, json, IngestionFormat};

/// Default key used to wrap non-object JSON values into a row.
pub const DEFAULT_SENTINEL_KEY: &str = "value";
/// Default key collecting delimited fields beyond the header.
pub const DEFAULT_OVERFLOW_KEY: &str = "_extra";

/// Options controlling ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, detect the format from filename / content type / content.
    pub format: Option<IngestionFormat>,
    /// Field name for non-object JSON values.
    pub sentinel_key: String,
    /// Field name for delimited fields beyond the header.
    pub overflow_key: String,
    /// Sniff the delimiter when the format is unknown; otherwise assume comma.
    pub sniff_delimiter: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("sentinel_key", &self.sentinel_key)
            .field("overflow_key", &self.overflow_key)
            .field("sniff_delimiter", &self.sniff_delimiter)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            sentinel_key: DEFAULT_SENTINEL_KEY.to_string(),
            overflow_key: DEFAULT_OVERFLOW_KEY.to_string(),
            sniff_delimiter: true,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Parse an uploaded buffer into rows.
///
/// Fails with [`IngestionError::EmptyInput`] for a zero-length buffer before any parser runs.
/// Parsing that succeeds with zero rows is *not* an error here; see
/// [`crate::pipeline::parse_and_summarize`] for the [`IngestionError::EmptyResult`] check.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use tabular_profile::ingestion::{parse_records, IngestionFormat, IngestionOptions};
///
/// let rs = parse_records(b"h1,h2\na,1\nb,2\n", "data.csv", None, &IngestionOptions::default())?;
/// assert_eq!(rs.format, IngestionFormat::Csv);
/// assert_eq!(rs.row_count(), 2);
/// assert_eq!(rs.columns, vec!["h1", "h2"]);
/// # Ok::<(), tabular_profile::IngestionError>(())
/// ```
pub fn parse_records(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
    options: &IngestionOptions,
) -> IngestionResult<RecordSet> {
    let (format, result) = parse_records_unobserved(bytes, filename, content_type, options);
    report_outcome(options, filename, bytes.len(), format, &result);
    result
}

/// Report one ingestion outcome to the configured observer, if any.
pub(crate) fn report_outcome(
    options: &IngestionOptions,
    filename: &str,
    bytes: usize,
    format: Option<IngestionFormat>,
    result: &IngestionResult<RecordSet>,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    let ctx = IngestionContext {
        filename: filename.to_string(),
        format,
        bytes,
    };
    match result {
        Ok(rs) => obs.on_success(
            &ctx,
            IngestionStats {
                rows: rs.row_count(),
                columns: rs.column_count(),
            },
        ),
        Err(e) => {
            let sev = IngestionSeverity::for_error(e);
            obs.on_failure(&ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }
    }
}

/// Parse without notifying the observer; also returns the format that was attempted or accepted.
pub(crate) fn parse_records_unobserved(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
    options: &IngestionOptions,
) -> (Option<IngestionFormat>, IngestionResult<RecordSet>) {
    if bytes.is_empty() {
        return (None, Err(IngestionError::EmptyInput));
    }

    let text = decode_text(bytes);
    let strategies = match options.format {
        Some(fmt) => vec![Strategy::Format(fmt)],
        None => candidate_strategies(filename, content_type, options.sniff_delimiter),
    };
    log::debug!("file={filename:?} strategies={strategies:?}");

    if let [only] = strategies.as_slice() {
        return match run_strategy(*only, &text, options) {
            Ok((fmt, rows)) => (Some(fmt), Ok(RecordSet::new(fmt, rows))),
            Err(e) => (strategy_format(*only), Err(e)),
        };
    }

    let mut failures = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        match run_strategy(strategy, &text, options) {
            Ok((fmt, rows)) => {
                log::debug!("file={filename:?} accepted as {fmt}");
                return (Some(fmt), Ok(RecordSet::new(fmt, rows)));
            }
            Err(e) => {
                log::debug!("file={filename:?} strategy {strategy:?} rejected: {e}");
                failures.push(format!("{}: {e}", strategy_label(strategy)));
            }
        }
    }

    let message = format!(
        "could not determine format of {filename:?}; expected CSV, TSV, JSON or JSON-Lines ({})",
        failures.join("; ")
    );
    (None, Err(IngestionError::UnsupportedFormat { message }))
}

/// Parse already-decoded text with one strategy.
fn run_strategy(
    strategy: Strategy,
    text: &str,
    options: &IngestionOptions,
) -> IngestionResult<(IngestionFormat, Vec<Row>)> {
    let format = match strategy {
        Strategy::Format(fmt) => fmt,
        Strategy::SniffDelimited => match delimited::sniff_delimiter(text) {
            Ok(delimiter) => IngestionFormat::for_delimiter(delimiter),
            // JSON-shaped text is left to the JSON strategy.
            Err(message) if delimited::looks_like_json(text) => {
                return Err(IngestionError::Parse {
                    format: IngestionFormat::Csv,
                    source: ParseFailure::Delimiter(message),
                });
            }
            Err(message) => {
                log::debug!("{message}; assuming comma-separated");
                IngestionFormat::Csv
            }
        },
    };
    let rows = parse_text(text, format, options)?;
    Ok((format, rows))
}

/// Parse decoded text with a known format.
pub fn parse_text(
    text: &str,
    format: IngestionFormat,
    options: &IngestionOptions,
) -> IngestionResult<Vec<Row>> {
    match format {
        IngestionFormat::Csv | IngestionFormat::Tsv | IngestionFormat::Delimited(_) => {
            let delimiter = format.delimiter().unwrap_or(b',');
            delimited::parse_delimited_str(text, delimiter, &options.overflow_key)
        }
        IngestionFormat::Json => json::parse_json_str(text, &options.sentinel_key),
        IngestionFormat::JsonLines => json::parse_json_lines_str(text, &options.sentinel_key),
    }
}

/// Lossy UTF-8 decode; invalid sequences become U+FFFD and a leading BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix('\u{feff}') {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

fn strategy_format(strategy: Strategy) -> Option<IngestionFormat> {
    match strategy {
        Strategy::Format(fmt) => Some(fmt),
        Strategy::SniffDelimited => None,
    }
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Format(fmt) if fmt.delimiter().is_some() => "delimited",
        Strategy::Format(fmt) => fmt.name(),
        Strategy::SniffDelimited => "delimited",
    }
}
