//! `quote-report` library crate.
//!
//! The binary (`quote-report`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - the renderer can be swapped (see `chart::ChartRenderer`)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
