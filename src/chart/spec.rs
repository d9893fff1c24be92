//! Declarative chart descriptions.
//!
//! Builders here are pure: the same symbol + series + trend always produce the
//! same `ChartSpec`. Nothing in this module touches pixels; a `ChartRenderer`
//! turns specs into images.

use serde::Serialize;

use crate::domain::{ChartKind, QuoteSeries, TokenSymbol, TrendResult};

const TOKEN_AMOUNT_COLOR: Rgba = Rgba::opaque(75, 192, 192);
const USDC_RETURN_COLOR: Rgba = Rgba::opaque(153, 102, 255);
const TREND_COLOR: Rgba = Rgba::opaque(255, 99, 132);
const SCATTER_COLOR: Rgba = Rgba {
    r: 75,
    g: 192,
    b: 192,
    a: 0.5,
};

/// Dash pattern (on, off) in pixels.
const TREND_DASH: [u32; 2] = [5, 5];

/// Pixel offsets of extreme-value labels from their point (y grows downward).
const MAX_LABEL_OFFSET: [i32; 2] = [10, -22];
const MIN_LABEL_OFFSET: [i32; 2] = [10, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Values of one dataset.
///
/// Line datasets are indexed by the chart's category labels; scatter datasets
/// carry their own `(x, y)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum DatasetValues {
    Indexed(Vec<f64>),
    Points(Vec<(f64, f64)>),
}

impl DatasetValues {
    pub fn len(&self) -> usize {
        match self {
            DatasetValues::Indexed(v) => v.len(),
            DatasetValues::Points(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(x, y)` pairs; indexed values use their position as `x`.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        match self {
            DatasetValues::Indexed(v) => v.iter().enumerate().map(|(i, &y)| (i as f64, y)).collect(),
            DatasetValues::Points(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: DatasetValues,
    pub color: Rgba,
    /// `Some([on, off])` draws the line dashed.
    pub dash: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    /// Force the y-axis to include zero.
    pub y_begin_at_zero: bool,
}

/// A labelled marker on a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Category index of the marked point.
    pub index: usize,
    pub value: f64,
    pub text: String,
    /// Text position relative to the point, in pixels.
    pub offset: [i32; 2],
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub chart_type: ChartType,
    /// Category labels for the x-axis (line charts only).
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
    pub annotations: Vec<Annotation>,
}

/// Token amount over time.
pub fn token_amount_chart(symbol: &TokenSymbol, series: &QuoteSeries) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::TokenAmount,
        chart_type: ChartType::Line,
        labels: series.time_labels(),
        datasets: vec![token_amount_dataset(series)],
        options: time_chart_options(format!("{symbol} Token Amount Over Time")),
        annotations: Vec::new(),
    }
}

/// USDC return over time.
pub fn usdc_return_chart(series: &QuoteSeries) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::UsdcReturn,
        chart_type: ChartType::Line,
        labels: series.time_labels(),
        datasets: vec![Dataset {
            label: "USDC Return".to_string(),
            values: DatasetValues::Indexed(series.usdc_returns()),
            color: USDC_RETURN_COLOR,
            dash: None,
        }],
        options: time_chart_options("USDC Return Value Over Time".to_string()),
        annotations: Vec::new(),
    }
}

/// Token amount with its OLS trend overlaid as a dashed line, plus min/max markers.
pub fn trend_line_chart(symbol: &TokenSymbol, series: &QuoteSeries, trend: &TrendResult) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::TrendLine,
        chart_type: ChartType::Line,
        labels: series.time_labels(),
        datasets: vec![
            token_amount_dataset(series),
            Dataset {
                label: "Trend Line".to_string(),
                values: DatasetValues::Indexed(trend.fitted_values.clone()),
                color: TREND_COLOR,
                dash: Some(TREND_DASH),
            },
        ],
        options: time_chart_options(format!("{symbol} Token Amount with Trend Line")),
        annotations: extreme_annotations(&series.token_amounts()),
    }
}

/// Token amount (x) against USDC return (y).
pub fn correlation_chart(series: &QuoteSeries) -> ChartSpec {
    let points = series
        .records()
        .iter()
        .map(|r| (r.token_amount, r.usdc_return))
        .collect();

    ChartSpec {
        kind: ChartKind::Correlation,
        chart_type: ChartType::Scatter,
        labels: Vec::new(),
        datasets: vec![Dataset {
            label: "Token Amount vs USDC Return".to_string(),
            values: DatasetValues::Points(points),
            color: SCATTER_COLOR,
            dash: None,
        }],
        options: ChartOptions {
            title: "Relationship Between Token Amount and USDC Return".to_string(),
            x_title: Some("Token Amount".to_string()),
            y_title: Some("USDC Return".to_string()),
            y_begin_at_zero: false,
        },
        annotations: Vec::new(),
    }
}

/// All four charts, in `ChartKind::ALL` order.
pub fn build_chart_specs(symbol: &TokenSymbol, series: &QuoteSeries, trend: &TrendResult) -> Vec<ChartSpec> {
    vec![
        token_amount_chart(symbol, series),
        usdc_return_chart(series),
        trend_line_chart(symbol, series, trend),
        correlation_chart(series),
    ]
}

fn token_amount_dataset(series: &QuoteSeries) -> Dataset {
    Dataset {
        label: "Token Amount".to_string(),
        values: DatasetValues::Indexed(series.token_amounts()),
        color: TOKEN_AMOUNT_COLOR,
        dash: None,
    }
}

/// `Max` and `Min` markers at the first largest and first smallest value.
fn extreme_annotations(values: &[f64]) -> Vec<Annotation> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let (mut max_idx, mut min_idx) = (0, 0);
    let (mut max, mut min) = (first, first);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > max {
            (max_idx, max) = (i, v);
        }
        if v < min {
            (min_idx, min) = (i, v);
        }
    }

    vec![
        Annotation {
            index: max_idx,
            value: max,
            text: format!("Max: {max:.2}"),
            offset: MAX_LABEL_OFFSET,
        },
        Annotation {
            index: min_idx,
            value: min,
            text: format!("Min: {min:.2}"),
            offset: MIN_LABEL_OFFSET,
        },
    ]
}

fn time_chart_options(title: String) -> ChartOptions {
    ChartOptions {
        title,
        x_title: None,
        y_title: None,
        y_begin_at_zero: true,
    }
}
