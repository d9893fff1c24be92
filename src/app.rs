//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into a `RunConfig`
//! - runs the pipeline (full report or summary only)
//! - logs any failure before handing it back for the exit code

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::chart::PlottersRenderer;
use crate::cli::{Cli, Command, RunArgs};
use crate::domain::{RunConfig, TokenSymbol};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `quote-report` binary.
pub fn run() -> Result<(), AppError> {
    // Before parsing, so `.env` values can back the CLI's env fallbacks.
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let result = match cli.command {
        Command::Report(args) => handle_report(&args),
        Command::Summary(args) => handle_summary(&args),
    };

    if let Err(err) = &result {
        error!(error = %err, exit_code = err.exit_code(), "run failed");
    }
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quote_report=info"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_report(args: &RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args)?;
    let out = pipeline::run_report(&config, &PlottersRenderer::default())?;

    info!(
        symbol = %config.symbol,
        charts = out.artifacts.len(),
        images_dir = %config.images_dir.display(),
        report = %out.report_path.display(),
        "processing complete"
    );
    Ok(())
}

fn handle_summary(args: &RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args)?;
    let analysis = pipeline::analyze(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config.symbol, &analysis.ingest, &analysis.trend, &analysis.correlation)
    );
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    let symbol = TokenSymbol::parse(&args.symbol)?;

    let image_base_url = args.image_base_url.trim().trim_end_matches('/').to_string();
    if image_base_url.is_empty() {
        return Err(AppError::Config("image base URL must not be empty".to_string()));
    }

    let csv_path = args
        .csv
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("quotes_{symbol}.csv")));

    Ok(RunConfig {
        symbol,
        csv_path,
        images_dir: args.images_dir.clone(),
        reports_dir: args.reports_dir.clone(),
        image_base_url,
        chart_width: args.width,
        chart_height: args.height,
        bad_rows: args.on_bad_row,
        export_specs: args.export_specs.clone(),
    })
}

/// Rewrite argv so `quote-report` defaults to `quote-report report`.
///
/// Rules:
/// - `quote-report`                     -> `quote-report report`
/// - `quote-report --symbol WETH ...`   -> `quote-report report --symbol WETH ...`
/// - `quote-report --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // A leading flag means "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MalformedRowPolicy;

    fn args(symbol: &str) -> RunArgs {
        RunArgs {
            symbol: symbol.to_string(),
            csv: None,
            images_dir: PathBuf::from("chart_images"),
            reports_dir: PathBuf::from("reports"),
            image_base_url: "https://example.org/imgs/ ".to_string(),
            width: 1200,
            height: 800,
            on_bad_row: MalformedRowPolicy::Fail,
            export_specs: None,
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["qr"])), argv(&["qr", "report"]));
        assert_eq!(
            rewrite_args(argv(&["qr", "-s", "WETH"])),
            argv(&["qr", "report", "-s", "WETH"])
        );
        assert_eq!(rewrite_args(argv(&["qr", "--help"])), argv(&["qr", "--help"]));
        assert_eq!(rewrite_args(argv(&["qr", "summary"])), argv(&["qr", "summary"]));
    }

    #[test]
    fn config_derives_csv_path_and_trims_url() {
        let config = run_config_from_args(&args("uSOL")).unwrap();
        assert_eq!(config.csv_path, PathBuf::from("quotes_uSOL.csv"));
        assert_eq!(config.image_base_url, "https://example.org/imgs");
    }

    #[test]
    fn config_rejects_unsafe_symbol() {
        let err = run_config_from_args(&args("../../etc")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn config_rejects_empty_base_url() {
        let mut a = args("uSOL");
        a.image_base_url = " / ".to_string();
        assert!(matches!(run_config_from_args(&a), Err(AppError::Config(_))));
    }
}
