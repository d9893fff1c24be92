//! CSV ingest for swap quote exports.
//!
//! This module turns a quotes CSV into a typed `QuoteSeries`.
//!
//! Design goals:
//! - **Strict schema** for the three required columns (clear errors + exit code 2)
//! - **Explicit bad-row handling**: fail fast, or skip and report, never NaN
//! - **File order preserved**: rows are not re-sorted

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{BASE_UNITS_PER_TOKEN, MalformedRowPolicy, QuoteRecord, QuoteSeries};
use crate::error::AppError;

const COL_QUOTED_AT: &str = "quoted_at";
const COL_OUTPUT_AMOUNT: &str = "output_amount";
const COL_OUTPUT_FORMATTED: &str = "output_amount_formatted";

const REQUIRED_COLUMNS: [&str; 3] = [COL_QUOTED_AT, COL_OUTPUT_AMOUNT, COL_OUTPUT_FORMATTED];

/// A row dropped under `MalformedRowPolicy::Skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed series + what was dropped on the way.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: QuoteSeries,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Open `path` and parse it as a quotes CSV.
pub fn load_quote_series(path: &Path, policy: MalformedRowPolicy) -> Result<IngestedSeries, AppError> {
    let file = File::open(path).map_err(|e| AppError::data_source(path, e))?;
    debug!(path = %path.display(), "reading quotes CSV");
    read_from(file, path, policy)
}

/// Parse quotes from any reader (header row required).
pub fn read_quote_series<R: Read>(input: R, policy: MalformedRowPolicy) -> Result<IngestedSeries, AppError> {
    read_from(input, Path::new("<reader>"), policy)
}

/// `source` names the input in I/O errors.
fn read_from<R: Read>(input: R, source: &Path, policy: MalformedRowPolicy) -> Result<IngestedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(source, 1, "Failed to read CSV headers", e))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let parsed = match result {
            Ok(record) => parse_row(&record, &header_map),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(AppError::data_source(source, e)),
            Err(e) => Err(format!("CSV parse error: {e}")),
        };

        match parsed {
            Ok(quote) => records.push(quote),
            Err(message) => match policy {
                MalformedRowPolicy::Fail => return Err(AppError::parse(line, message)),
                MalformedRowPolicy::Skip => {
                    warn!(line, %message, "skipping malformed row");
                    row_errors.push(RowError { line, message });
                }
            },
        }
    }

    Ok(IngestedSeries {
        series: QuoteSeries::new(records),
        row_errors,
        rows_read,
    })
}

/// I/O failures are the data source's fault; anything else is malformed content.
fn csv_error(source: &Path, line: usize, context: &str, e: csv::Error) -> AppError {
    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
        AppError::data_source(source, e)
    } else {
        AppError::parse(line, format!("{context}: {e}"))
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::parse(
        1,
        format!("Missing required column(s): `{}`", missing.join("`, `")),
    ))
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<QuoteRecord, String> {
    let timestamp = parse_timestamp(get_required(record, header_map, COL_QUOTED_AT)?)?;
    let raw_amount = parse_f64(get_required(record, header_map, COL_OUTPUT_AMOUNT)?, COL_OUTPUT_AMOUNT)?;
    let usdc_return = parse_f64(
        get_required(record, header_map, COL_OUTPUT_FORMATTED)?,
        COL_OUTPUT_FORMATTED,
    )?;

    Ok(QuoteRecord {
        timestamp,
        token_amount: raw_amount / BASE_UNITS_PER_TOKEN,
        usdc_return,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_f64(s: &str, column: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{column}` value '{s}' (expected a finite number).")),
    }
}

/// Parse a `quoted_at` value.
///
/// Database exports disagree on timestamp shape, so we accept RFC 3339 plus the
/// usual `YYYY-MM-DD HH:MM:SS[.fff][±HH[:MM]]` variants. Values without an
/// offset are taken as UTC.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    const OFFSET_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    const NAIVE_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    for fmt in NAIVE_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    Err(format!(
        "Invalid `{COL_QUOTED_AT}` value '{s}'. Expected RFC 3339 or YYYY-MM-DD[ HH:MM[:SS]]."
    ))
}
