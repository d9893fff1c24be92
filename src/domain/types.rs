//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during the statistics pass
//! - handed to chart builders and the report composer without conversion
//! - exported to JSON where it helps debugging (chart specs)

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::AppError;

/// Number of base units per whole token.
pub const BASE_UNITS_PER_TOKEN: f64 = 1e18;

/// Longest accepted token symbol.
const SYMBOL_MAX_LEN: usize = 32;

/// One parsed CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub timestamp: DateTime<Utc>,
    /// Token amount in whole tokens (`output_amount / 1e18`).
    pub token_amount: f64,
    /// USDC returned by the quote (`output_amount_formatted`).
    pub usdc_return: f64,
}

/// Quotes in file order. Not re-sorted: the input is assumed chronological.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSeries {
    records: Vec<QuoteRecord>,
}

impl QuoteSeries {
    pub fn new(records: Vec<QuoteRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    pub fn token_amounts(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.token_amount).collect()
    }

    pub fn usdc_returns(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.usdc_return).collect()
    }

    /// `HH:MM` (UTC) per record, used as the x-axis of the time charts.
    pub fn time_labels(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.timestamp.format("%H:%M").to_string())
            .collect()
    }
}

impl FromIterator<QuoteRecord> for QuoteSeries {
    fn from_iter<T: IntoIterator<Item = QuoteRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// OLS fit of a series against its index positions.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub slope: f64,
    pub intercept: f64,
    /// `slope * i + intercept` for every index of the input.
    pub fitted_values: Vec<f64>,
}

/// Pearson correlation between two equal-length series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    /// Always within `[-1, 1]`.
    pub coefficient: f64,
    pub n: usize,
}

/// Count / mean / min / max of one projection of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// The four charts produced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    TokenAmount,
    UsdcReturn,
    TrendLine,
    Correlation,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TokenAmount,
        ChartKind::UsdcReturn,
        ChartKind::TrendLine,
        ChartKind::Correlation,
    ];

    /// Stable file-name stem, appended to the token symbol.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::TokenAmount => "token_amount",
            ChartKind::UsdcReturn => "usdc_return",
            ChartKind::TrendLine => "trend_lines",
            ChartKind::Correlation => "correlation",
        }
    }

    pub fn file_name(self, symbol: &TokenSymbol) -> String {
        format!("{symbol}_{}.png", self.file_stem())
    }
}

/// A chart image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub file_path: PathBuf,
    pub kind: ChartKind,
}

impl ChartArtifact {
    /// Bare file name, used when linking the image from the report.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Rendered Markdown report, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub file_name: String,
    pub content: String,
}

/// A token symbol that is safe to embed in file names and Markdown.
///
/// Accepts ASCII letters, digits, `.`, `_` and `-` (not leading `.`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenSymbol(String);

impl TokenSymbol {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(AppError::Config("token symbol must not be empty".to_string()));
        }
        if s.len() > SYMBOL_MAX_LEN {
            return Err(AppError::Config(format!(
                "token symbol '{s}' is longer than {SYMBOL_MAX_LEN} characters"
            )));
        }
        if s.starts_with('.') {
            return Err(AppError::Config(format!("token symbol '{s}' must not start with '.'")));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(AppError::Config(format!(
                "token symbol '{s}' contains unsupported character '{bad}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with a CSV row whose fields do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MalformedRowPolicy {
    /// Stop the run at the first bad row.
    Fail,
    /// Drop the row, log it, and keep going.
    Skip,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags / environment (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub symbol: TokenSymbol,
    pub csv_path: PathBuf,
    pub images_dir: PathBuf,
    pub reports_dir: PathBuf,
    /// Remote location the images are published to; no trailing slash.
    pub image_base_url: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub bad_rows: MalformedRowPolicy,
    pub export_specs: Option<PathBuf>,
}

impl RunConfig {
    pub fn image_path(&self, kind: ChartKind) -> PathBuf {
        self.images_dir.join(kind.file_name(&self.symbol))
    }

    pub fn report_file_name(&self) -> String {
        format!("{}_analysis_report.md", self.symbol)
    }

    pub fn report_path(&self) -> PathBuf {
        self.reports_dir.join(self.report_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(hour: u32, minute: u32, token_amount: f64, usdc_return: f64) -> QuoteRecord {
        QuoteRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap(),
            token_amount,
            usdc_return,
        }
    }

    #[test]
    fn series_projections_keep_file_order() {
        let series: QuoteSeries = vec![record(9, 5, 2.0, 20.0), record(8, 0, 1.0, 10.0)]
            .into_iter()
            .collect();
        assert_eq!(series.token_amounts(), vec![2.0, 1.0]);
        assert_eq!(series.usdc_returns(), vec![20.0, 10.0]);
        assert_eq!(series.time_labels(), vec!["09:05", "08:00"]);
    }

    #[test]
    fn symbol_accepts_typical_tickers() {
        for s in ["uSOL", "WETH", "usd-c", "cb.BTC", "TOKEN_2"] {
            assert_eq!(TokenSymbol::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn symbol_rejects_markdown_and_paths() {
        for s in ["", "  ", "../etc", "a/b", "x](http://evil)", "*bold*", ".hidden", "a b"] {
            assert!(matches!(TokenSymbol::parse(s), Err(AppError::Config(_))), "accepted {s:?}");
        }
        assert!(TokenSymbol::parse(&"A".repeat(33)).is_err());
    }

    #[test]
    fn artifact_paths_follow_naming_convention() {
        let config = RunConfig {
            symbol: TokenSymbol::parse("uSOL").unwrap(),
            csv_path: PathBuf::from("quotes_uSOL.csv"),
            images_dir: PathBuf::from("chart_images"),
            reports_dir: PathBuf::from("reports"),
            image_base_url: "https://example.com/img".to_string(),
            chart_width: 1200,
            chart_height: 800,
            bad_rows: MalformedRowPolicy::Fail,
            export_specs: None,
        };
        assert_eq!(
            config.image_path(ChartKind::TrendLine),
            PathBuf::from("chart_images").join("uSOL_trend_lines.png")
        );
        assert_eq!(
            config.report_path(),
            PathBuf::from("reports").join("uSOL_analysis_report.md")
        );
        let names: Vec<String> = ChartKind::ALL.iter().map(|k| k.file_name(&config.symbol)).collect();
        assert_eq!(
            names,
            vec![
                "uSOL_token_amount.png",
                "uSOL_usdc_return.png",
                "uSOL_trend_lines.png",
                "uSOL_correlation.png"
            ]
        );
    }

    #[test]
    fn chart_kind_exports_as_snake_case() {
        let json = serde_json::to_string(&ChartKind::ALL).unwrap();
        assert_eq!(json, r#"["token_amount","usdc_return","trend_line","correlation"]"#);
    }
}
