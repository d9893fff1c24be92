//! Markdown analysis report.
//!
//! The layout is fixed; only the numbers, the symbol and the image links vary.
//! Images are linked by absolute URL (`{image_base_url}/{file_name}`) because the
//! report is published alongside the images on a static host, not read locally.

use chrono::NaiveDateTime;

use super::{CorrelationDirection, CorrelationStrength};
use crate::domain::{ChartArtifact, ChartKind, CorrelationResult, QuoteSeries, ReportDocument, TokenSymbol};
use crate::error::AppError;
use crate::math::summarize;

/// Build the report for one symbol.
pub fn compose_report(
    symbol: &TokenSymbol,
    artifacts: &[ChartArtifact],
    series: &QuoteSeries,
    correlation: &CorrelationResult,
    image_base_url: &str,
    generated_at: NaiveDateTime,
) -> Result<ReportDocument, AppError> {
    let token = summarize(&series.token_amounts())?;
    let usdc = summarize(&series.usdc_returns())?;

    let image_url = |kind: ChartKind| -> Result<String, AppError> {
        let artifact = artifacts
            .iter()
            .find(|a| a.kind == kind)
            .ok_or_else(|| AppError::degenerate(format!("no {kind:?} chart was produced for the report")))?;
        Ok(format!("{}/{}", image_base_url.trim_end_matches('/'), artifact.file_name()))
    };
    let token_amount_url = image_url(ChartKind::TokenAmount)?;
    let trend_url = image_url(ChartKind::TrendLine)?;
    let correlation_url = image_url(ChartKind::Correlation)?;

    let r = correlation.coefficient;
    let strength = CorrelationStrength::classify(r);
    let direction = CorrelationDirection::classify(r);

    let content = format!(
        "# {symbol} Price Analysis Report

Generated on: {generated}

## Overview

This report provides a comprehensive analysis of {symbol} token price data including:
- Basic price trend visualization
- Enhanced trend analysis with annotations
- Correlation analysis between token amount and USDC return
- Statistical summary

## Key Metrics

| Metric | Value |
|--------|-------|
| **Data Points** | {points} |
| **Correlation Coefficient** | {r:.4} |
| **Token Amount Range** | {token_min:.2} - {token_max:.2} |
| **USDC Return Range** | {usdc_min:.2} - {usdc_max:.2} |

## Basic Price Charts

The following charts show the basic price trends for {symbol} token amount and USDC return over time.

![{symbol} Basic Price Charts]({token_amount_url})

## Enhanced Trend Analysis

These enhanced visualizations include trend lines and annotations highlighting minimum and maximum values.

![{symbol} Enhanced Trend Charts]({trend_url})

## Correlation Analysis

The scatter plot below shows the relationship between token amount and USDC return, with a correlation coefficient of **{r:.4}**.

![{symbol} Correlation Analysis]({correlation_url})

## Statistical Summary

### {symbol} Token Amount Statistics
- **Count**: {token_count}
- **Mean**: {token_mean:.4}
- **Minimum**: {token_min:.4}
- **Maximum**: {token_max:.4}

### USDC Return Statistics
- **Count**: {usdc_count}
- **Mean**: {usdc_mean:.4}
- **Minimum**: {usdc_min:.4}
- **Maximum**: {usdc_max:.4}

## Interpretation

### {heading} Correlation

The correlation coefficient of {r:.4} indicates a {strength} {direction} relationship between token amount and USDC return.

---

*Report generated by VaporFund Analytics*
",
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
        points = series.len(),
        token_min = token.min,
        token_max = token.max,
        token_count = token.count,
        token_mean = token.mean,
        usdc_min = usdc.min,
        usdc_max = usdc.max,
        usdc_count = usdc.count,
        usdc_mean = usdc.mean,
        heading = strength.title(),
        strength = strength.as_str(),
        direction = direction.as_str(),
    );

    Ok(ReportDocument {
        file_name: format!("{symbol}_analysis_report.md"),
        content,
    })
}
