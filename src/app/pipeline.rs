//! Shared pipeline logic used by both subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> trend + correlation -> chart specs -> render -> write images -> report
//!
//! `summary` stops after the statistics; `report` runs the whole chain.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::chart::{ChartRenderer, build_chart_specs};
use crate::domain::{ChartArtifact, CorrelationResult, RunConfig, TrendResult};
use crate::error::AppError;
use crate::io::{IngestedSeries, ensure_dirs, load_quote_series, write_chart_image, write_chart_specs_json, write_report};
use crate::math::{compute_correlation, compute_trend_line};
use crate::report::compose_report;

/// Loaded quotes plus the statistics derived from them.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub ingest: IngestedSeries,
    pub trend: TrendResult,
    pub correlation: CorrelationResult,
}

/// All outputs of a single `report` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub analysis: Analysis,
    pub artifacts: Vec<ChartArtifact>,
    pub report_path: PathBuf,
}

/// Load the CSV and compute trend + correlation.
pub fn analyze(config: &RunConfig) -> Result<Analysis, AppError> {
    let ingest = load_quote_series(&config.csv_path, config.bad_rows)?;
    info!(
        symbol = %config.symbol,
        csv = %config.csv_path.display(),
        rows = ingest.series.len(),
        skipped = ingest.row_errors.len(),
        "loaded quotes"
    );

    let token_amounts = ingest.series.token_amounts();
    let trend = compute_trend_line(&token_amounts)?;
    let correlation = compute_correlation(&token_amounts, &ingest.series.usdc_returns())?;
    info!(
        slope = trend.slope,
        intercept = trend.intercept,
        correlation = correlation.coefficient,
        "computed statistics"
    );

    Ok(Analysis {
        ingest,
        trend,
        correlation,
    })
}

/// Execute the full report pipeline, stamping the report with the current local time.
pub fn run_report(config: &RunConfig, renderer: &dyn ChartRenderer) -> Result<RunOutput, AppError> {
    run_report_at(config, renderer, Local::now().naive_local())
}

/// Execute the full report pipeline with an explicit report timestamp.
pub fn run_report_at(
    config: &RunConfig,
    renderer: &dyn ChartRenderer,
    generated_at: NaiveDateTime,
) -> Result<RunOutput, AppError> {
    ensure_dirs([config.images_dir.as_path(), config.reports_dir.as_path()])?;
    info!(base_url = %config.image_base_url, "report will link images from the published location");

    let analysis = analyze(config)?;
    let series = &analysis.ingest.series;

    let specs = build_chart_specs(&config.symbol, series, &analysis.trend);
    if let Some(path) = &config.export_specs {
        write_chart_specs_json(path, &specs)?;
        info!(path = %path.display(), "exported chart specs");
    }

    let mut artifacts = Vec::with_capacity(specs.len());
    for spec in &specs {
        let bytes = renderer.render(spec, config.chart_width, config.chart_height)?;
        let artifact = write_chart_image(config.image_path(spec.kind), spec.kind, &bytes)?;
        info!(kind = ?artifact.kind, path = %artifact.file_path.display(), "wrote chart");
        artifacts.push(artifact);
    }

    let report = compose_report(
        &config.symbol,
        &artifacts,
        series,
        &analysis.correlation,
        &config.image_base_url,
        generated_at,
    )?;
    let report_path = write_report(&config.reports_dir, &report)?;
    info!(path = %report_path.display(), "wrote report");

    Ok(RunOutput {
        analysis,
        artifacts,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    use chrono::NaiveDate;

    use crate::chart::ChartSpec;
    use crate::domain::{ChartKind, MalformedRowPolicy, TokenSymbol};

    /// Records what it was asked to draw and returns a fixed payload.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(ChartKind, u32, u32)>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, AppError> {
            self.calls.borrow_mut().push((spec.kind, width, height));
            Ok(b"\x89PNG-stub".to_vec())
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _spec: &ChartSpec, _width: u32, _height: u32) -> Result<Vec<u8>, AppError> {
            Err(AppError::Render("backend unavailable".to_string()))
        }
    }

    const FIVE_ROWS: &str = "quoted_at,output_amount,output_amount_formatted\n\
        2025-06-01 10:00:00,1000000000000000000,10\n\
        2025-06-01 10:05:00,2000000000000000000,20\n\
        2025-06-01 10:10:00,3000000000000000000,30\n\
        2025-06-01 10:15:00,4000000000000000000,40\n\
        2025-06-01 10:20:00,5000000000000000000,50\n";

    fn config_in(root: &Path, csv: &str) -> RunConfig {
        let csv_path = root.join("quotes_uSOL.csv");
        fs::write(&csv_path, csv).unwrap();
        RunConfig {
            symbol: TokenSymbol::parse("uSOL").unwrap(),
            csv_path,
            images_dir: root.join("chart_images"),
            reports_dir: root.join("reports"),
            image_base_url: "https://example.org/weekly/chart_images".to_string(),
            chart_width: 1200,
            chart_height: 800,
            bad_rows: MalformedRowPolicy::Fail,
            export_specs: None,
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn end_to_end_five_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), FIVE_ROWS);
        config.export_specs = Some(dir.path().join("specs.json"));
        let renderer = RecordingRenderer::default();

        let out = run_report_at(&config, &renderer, generated_at()).unwrap();

        assert_eq!(out.analysis.ingest.series.token_amounts(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((out.analysis.correlation.coefficient - 1.0).abs() < 1e-12);
        assert!((out.analysis.trend.slope - 1.0).abs() < 1e-12);
        assert!((out.analysis.trend.intercept - 1.0).abs() < 1e-12);

        let calls = renderer.calls.borrow();
        let kinds: Vec<ChartKind> = calls.iter().map(|c| c.0).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        assert!(calls.iter().all(|&(_, w, h)| (w, h) == (1200, 800)));

        for kind in ChartKind::ALL {
            let path = config.image_path(kind);
            assert_eq!(fs::read(&path).unwrap(), b"\x89PNG-stub", "{}", path.display());
        }
        assert!(config.export_specs.as_ref().unwrap().exists());

        assert_eq!(out.report_path, dir.path().join("reports").join("uSOL_analysis_report.md"));
        let md = fs::read_to_string(&out.report_path).unwrap();
        assert!(md.contains("| **Correlation Coefficient** | 1.0000 |"));
        assert!(md.contains("Strong Correlation"));
        assert!(md.contains("positive"));
        assert!(md.contains("(https://example.org/weekly/chart_images/uSOL_trend_lines.png)"));
    }

    #[test]
    fn analyze_only_touches_the_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), FIVE_ROWS);

        let analysis = analyze(&config).unwrap();

        assert_eq!(analysis.trend.fitted_values.len(), 5);
        assert!(!config.images_dir.exists());
        assert!(!config.reports_dir.exists());
    }

    #[test]
    fn zero_variance_stops_before_any_chart() {
        let dir = tempfile::tempdir().unwrap();
        let flat = "quoted_at,output_amount,output_amount_formatted\n\
                    2025-06-01 10:00:00,1000000000000000000,10\n\
                    2025-06-01 10:05:00,1000000000000000000,20\n";
        let config = config_in(dir.path(), flat);
        let renderer = RecordingRenderer::default();

        let err = run_report_at(&config, &renderer, generated_at()).unwrap_err();

        assert!(matches!(err, AppError::DegenerateInput(_)));
        assert!(renderer.calls.borrow().is_empty());
        assert!(!config.report_path().exists());
    }

    #[test]
    fn inexact_constant_amounts_are_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let flat = "quoted_at,output_amount,output_amount_formatted\n\
                    2025-06-01 10:00:00,100000000000000000,1\n\
                    2025-06-01 10:05:00,100000000000000000,2\n\
                    2025-06-01 10:10:00,100000000000000000,10\n";
        let config = config_in(dir.path(), flat);
        let renderer = RecordingRenderer::default();

        let err = run_report_at(&config, &renderer, generated_at()).unwrap_err();

        assert!(matches!(err, AppError::DegenerateInput(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(renderer.calls.borrow().is_empty());
        assert!(!config.report_path().exists());
    }

    #[test]
    fn render_failure_is_fatal_and_leaves_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), FIVE_ROWS);

        let err = run_report_at(&config, &FailingRenderer, generated_at()).unwrap_err();

        assert!(matches!(err, AppError::Render(_)));
        assert_eq!(err.exit_code(), 4);
        assert!(!config.report_path().exists());
    }

    #[test]
    fn bad_row_fails_by_default_and_is_skipped_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{FIVE_ROWS}2025-06-01 10:25:00,not-a-number,60\n");
        let mut config = config_in(dir.path(), &csv);

        match analyze(&config) {
            Err(AppError::Parse { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected parse error, got {other:?}"),
        }

        config.bad_rows = MalformedRowPolicy::Skip;
        let analysis = analyze(&config).unwrap();
        assert_eq!(analysis.ingest.series.len(), 5);
        assert_eq!(analysis.ingest.row_errors.len(), 1);
    }

    #[test]
    fn missing_csv_is_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), FIVE_ROWS);
        config.csv_path = dir.path().join("absent.csv");

        let err = analyze(&config).unwrap_err();
        assert!(matches!(err, AppError::DataSource { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
