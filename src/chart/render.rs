//! Chart rasterization.
//!
//! The pipeline only depends on the `ChartRenderer` capability (spec in, PNG
//! bytes out). `PlottersRenderer` is the bundled implementation.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::spec::{ChartSpec, ChartType, Dataset, Rgba};
use crate::error::AppError;

/// Turns a declarative chart description into encoded image bytes.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, AppError>;
}

/// PNG renderer backed by Plotters' bitmap backend.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    pub font_family: &'static str,
    pub title_size: u32,
    pub label_size: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            font_family: "sans-serif",
            title_size: 28,
            label_size: 14,
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, AppError> {
        validate(spec)?;

        // The bitmap backend encodes on `present()` based on the file extension.
        let tmp = tempfile::Builder::new()
            .prefix("quote-report-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| AppError::Render(format!("failed to create temp image: {e}")))?;

        self.draw_to_file(tmp.path(), spec, width, height)?;

        std::fs::read(tmp.path()).map_err(|e| AppError::Render(format!("failed to read rendered image: {e}")))
    }
}

impl PlottersRenderer {
    fn draw_to_file(&self, path: &Path, spec: &ChartSpec, width: u32, height: u32) -> Result<(), AppError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        match spec.chart_type {
            ChartType::Line => self.draw_line_chart(&root, spec)?,
            ChartType::Scatter => self.draw_scatter_chart(&root, spec)?,
        }

        root.present().map_err(render_err)
    }

    fn draw_line_chart<'a, DB: DrawingBackend + 'a>(
        &self,
        root: &'a DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), AppError> {
        let n = spec
            .datasets
            .iter()
            .map(|d| d.values.len())
            .chain(std::iter::once(spec.labels.len()))
            .max()
            .unwrap_or(0);
        let x_max = n.saturating_sub(1).max(1) as f64;
        let ys: Vec<f64> = spec.datasets.iter().flat_map(|d| d.values.xy()).map(|(_, y)| y).collect();
        let (y0, y1) = axis_range(&ys, spec.options.y_begin_at_zero);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.options.title, (self.font_family, self.title_size))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, y0..y1)
            .map_err(render_err)?;

        let labels = &spec.labels;
        let fmt_x = |x: &f64| category_label(labels, *x);
        {
            let mut mesh = chart.configure_mesh();
            mesh.x_labels(labels.len().clamp(2, 12))
                .y_labels(8)
                .x_label_formatter(&fmt_x)
                .label_style((self.font_family, self.label_size));
            if let Some(t) = &spec.options.x_title {
                mesh.x_desc(t.as_str());
            }
            if let Some(t) = &spec.options.y_title {
                mesh.y_desc(t.as_str());
            }
            mesh.draw().map_err(render_err)?;
        }

        for ds in &spec.datasets {
            let style = to_color(ds.color).stroke_width(2);
            let points = ds.values.xy();
            let anno = match ds.dash {
                None => chart.draw_series(LineSeries::new(points, style)).map_err(render_err)?,
                Some([on, off]) => chart
                    .draw_series(DashedLineSeries::new(points, on as i32, off as i32, style))
                    .map_err(render_err)?,
            };
            anno.label(ds.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        let marker = BLACK.filled();
        let font = (self.font_family, self.label_size);
        chart
            .draw_series(spec.annotations.iter().map(|a| {
                EmptyElement::at((a.index as f64, a.value))
                    + Circle::new((0, 0), 4, marker)
                    + Text::new(a.text.clone(), (a.offset[0], a.offset[1]), font)
            }))
            .map_err(render_err)?;

        self.draw_legend(&mut chart)
    }

    fn draw_scatter_chart<'a, DB: DrawingBackend + 'a>(
        &self,
        root: &'a DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), AppError> {
        let points: Vec<(f64, f64)> = spec.datasets.iter().flat_map(|d| d.values.xy()).collect();
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let (x0, x1) = axis_range(&xs, false);
        let (y0, y1) = axis_range(&ys, spec.options.y_begin_at_zero);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.options.title, (self.font_family, self.title_size))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.x_labels(8).y_labels(8).label_style((self.font_family, self.label_size));
            if let Some(t) = &spec.options.x_title {
                mesh.x_desc(t.as_str());
            }
            if let Some(t) = &spec.options.y_title {
                mesh.y_desc(t.as_str());
            }
            mesh.draw().map_err(render_err)?;
        }

        for ds in &spec.datasets {
            let style = to_color(ds.color).filled();
            chart
                .draw_series(ds.values.xy().into_iter().map(|p| Circle::new(p, 5, style)))
                .map_err(render_err)?
                .label(ds.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, style));
        }

        self.draw_legend(&mut chart)
    }

    fn draw_legend<'a, DB: DrawingBackend + 'a>(
        &self,
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    ) -> Result<(), AppError> {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((self.font_family, self.label_size))
            .draw()
            .map_err(render_err)
    }
}

fn validate(spec: &ChartSpec) -> Result<(), AppError> {
    if spec.datasets.is_empty() || spec.datasets.iter().all(|d| d.values.is_empty()) {
        return Err(AppError::Render(format!("{:?} chart has no data to plot", spec.kind)));
    }
    if let Some(ds) = spec.datasets.iter().find(|d| !all_finite(d)) {
        return Err(AppError::Render(format!(
            "{:?} chart dataset '{}' contains non-finite values",
            spec.kind, ds.label
        )));
    }
    let points = spec.datasets.iter().map(|d| d.values.len()).max().unwrap_or(0);
    if let Some(a) = spec
        .annotations
        .iter()
        .find(|a| a.index >= points || !a.value.is_finite())
    {
        return Err(AppError::Render(format!(
            "{:?} chart annotation '{}' is outside the plotted data",
            spec.kind, a.text
        )));
    }
    Ok(())
}

fn all_finite(ds: &Dataset) -> bool {
    ds.values.xy().iter().all(|(x, y)| x.is_finite() && y.is_finite())
}

/// Label for an x tick on a category axis; fractional ticks stay blank.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-9 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Padded `[lo, hi]` covering `values` (and zero when `include_zero`).
fn axis_range(values: &[f64], include_zero: bool) -> (f64, f64) {
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }

    let span = hi - lo;
    if span.abs() < 1e-12 {
        let pad = if lo.abs() > 0.0 { lo.abs() * 0.1 } else { 1.0 };
        return (lo - pad, hi + pad);
    }

    let pad = span * 0.05;
    let lo_padded = if include_zero && lo >= 0.0 { lo } else { lo - pad };
    (lo_padded, hi + pad)
}

fn to_color(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

fn render_err(e: impl std::fmt::Display) -> AppError {
    AppError::Render(e.to_string())
}
