//! Plain-text run summary for the terminal (`quote-report summary`).

use crate::domain::{CorrelationResult, SeriesStats, TokenSymbol, TrendResult};
use crate::io::IngestedSeries;
use crate::math::summarize;

use super::{CorrelationDirection, CorrelationStrength};

/// Format dataset stats, trend and correlation as an aligned text block.
pub fn format_run_summary(
    symbol: &TokenSymbol,
    ingest: &IngestedSeries,
    trend: &TrendResult,
    correlation: &CorrelationResult,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== quote-report - {symbol} ===\n"));
    out.push_str(&format!(
        "Rows: read={} | used={} | skipped={}\n",
        ingest.rows_read,
        ingest.series.len(),
        ingest.row_errors.len()
    ));
    if let (Some(first), Some(last)) = (ingest.series.records().first(), ingest.series.records().last()) {
        out.push_str(&format!(
            "Window: {} .. {}\n",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M")
        ));
    }

    out.push('\n');
    out.push_str(&format!("{:<14} {:>8} {:>14} {:>14} {:>14}\n", "series", "count", "mean", "min", "max"));
    out.push_str(&format!("{:-<14} {:-<8} {:-<14} {:-<14} {:-<14}\n", "", "", "", "", ""));
    if let Ok(s) = summarize(&ingest.series.token_amounts()) {
        out.push_str(&stats_row("token_amount", &s));
    }
    if let Ok(s) = summarize(&ingest.series.usdc_returns()) {
        out.push_str(&stats_row("usdc_return", &s));
    }

    out.push('\n');
    out.push_str(&format!(
        "Trend: slope={:.6} intercept={:.6} (per row)\n",
        trend.slope, trend.intercept
    ));
    let r = correlation.coefficient;
    out.push_str(&format!(
        "Correlation: r={r:.4} ({} {})\n",
        CorrelationStrength::classify(r).as_str(),
        CorrelationDirection::classify(r).as_str()
    ));

    for e in &ingest.row_errors {
        out.push_str(&format!("  (skipped line {}) {}\n", e.line, e.message));
    }

    out
}

fn stats_row(name: &str, s: &SeriesStats) -> String {
    format!(
        "{:<14} {:>8} {:>14.4} {:>14.4} {:>14.4}\n",
        name, s.count, s.mean, s.min, s.max
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MalformedRowPolicy, QuoteSeries};
    use crate::io::{RowError, read_quote_series};
    use crate::math::{compute_correlation, compute_trend_line};

    #[test]
    fn summary_lists_stats_trend_and_skips() {
        let csv = "quoted_at,output_amount,output_amount_formatted\n\
                   2025-06-01 10:00:00,1000000000000000000,10\n\
                   2025-06-01 10:05:00,2000000000000000000,20\n\
                   2025-06-01 10:10:00,oops,30\n\
                   2025-06-01 10:15:00,3000000000000000000,30\n";
        let ingest = read_quote_series(csv.as_bytes(), MalformedRowPolicy::Skip).unwrap();
        let trend = compute_trend_line(&ingest.series.token_amounts()).unwrap();
        let corr = compute_correlation(&ingest.series.token_amounts(), &ingest.series.usdc_returns()).unwrap();
        let symbol = TokenSymbol::parse("uSOL").unwrap();

        let text = format_run_summary(&symbol, &ingest, &trend, &corr);
        assert!(text.contains("=== quote-report - uSOL ==="));
        assert!(text.contains("Rows: read=4 | used=3 | skipped=1"));
        assert!(text.contains("Window: 2025-06-01 10:00 .. 2025-06-01 10:15"));
        assert!(text.contains("token_amount"));
        assert!(text.contains("slope=1.000000"));
        assert!(text.contains("r=1.0000 (strong positive)"));
        assert!(text.contains("(skipped line 4)"));
    }

    #[test]
    fn empty_ingest_still_formats() {
        let ingest = IngestedSeries {
            series: QuoteSeries::default(),
            row_errors: vec![RowError { line: 2, message: "bad".to_string() }],
            rows_read: 1,
        };
        let trend = TrendResult { slope: 0.0, intercept: 0.0, fitted_values: vec![] };
        let corr = CorrelationResult { coefficient: 0.0, n: 0 };
        let text = format_run_summary(&TokenSymbol::parse("X").unwrap(), &ingest, &trend, &corr);
        assert!(text.contains("used=0"));
        assert!(!text.contains("Window:"));
    }
}
