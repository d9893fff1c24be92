//! Command-line parsing for the quote report generator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! statistics and rendering code. Every option can also come from the
//! environment (or a `.env` file), so scheduled runs need no flags at all.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::MalformedRowPolicy;

/// Where published chart images live unless configured otherwise.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/VaporFund/weekly-reports/main/chart_images";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "quote-report",
    version,
    about = "Swap quote statistics, charts and Markdown report for one token"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load quotes, render the four charts and write the Markdown report.
    Report(RunArgs),
    /// Load quotes and print statistics only (writes nothing).
    Summary(RunArgs),
}

/// Options shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Token symbol; used in titles and output file names.
    #[arg(short = 's', long, env = "QUOTE_REPORT_SYMBOL", default_value = "uSOL")]
    pub symbol: String,

    /// Quotes CSV (defaults to `quotes_{symbol}.csv`).
    #[arg(long, env = "QUOTE_REPORT_CSV", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Directory chart images are written to.
    #[arg(long, env = "QUOTE_REPORT_IMAGES_DIR", default_value = "chart_images")]
    pub images_dir: PathBuf,

    /// Directory the Markdown report is written to.
    #[arg(long, env = "QUOTE_REPORT_REPORTS_DIR", default_value = "reports")]
    pub reports_dir: PathBuf,

    /// Base URL the report uses to link images (images are expected to be published there).
    #[arg(long, env = "QUOTE_REPORT_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    pub image_base_url: String,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(100..=8000))]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(100..=8000))]
    pub height: u32,

    /// What to do with rows whose fields do not parse.
    #[arg(long = "on-bad-row", value_enum, default_value_t = MalformedRowPolicy::Fail)]
    pub on_bad_row: MalformedRowPolicy,

    /// Also write the chart specs as JSON (report only).
    #[arg(long = "export-specs", value_name = "JSON")]
    pub export_specs: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_layout() {
        let cli = Cli::try_parse_from(["quote-report", "report"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report subcommand");
        };
        assert_eq!(args.width, 1200);
        assert_eq!(args.height, 800);
        assert_eq!(args.images_dir, PathBuf::from("chart_images"));
        assert_eq!(args.reports_dir, PathBuf::from("reports"));
        assert_eq!(args.on_bad_row, MalformedRowPolicy::Fail);
        assert!(args.export_specs.is_none());
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "quote-report",
            "summary",
            "-s",
            "WETH",
            "--csv",
            "data/weth.csv",
            "--on-bad-row",
            "skip",
            "--width",
            "640",
        ])
        .unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary subcommand");
        };
        assert_eq!(args.symbol, "WETH");
        assert_eq!(args.csv, Some(PathBuf::from("data/weth.csv")));
        assert_eq!(args.on_bad_row, MalformedRowPolicy::Skip);
        assert_eq!(args.width, 640);
    }

    #[test]
    fn rejects_tiny_canvas() {
        assert!(Cli::try_parse_from(["quote-report", "report", "--height", "10"]).is_err());
    }
}
