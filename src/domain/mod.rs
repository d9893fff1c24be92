//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed quote records and the series they form (`QuoteRecord`, `QuoteSeries`)
//! - statistics outputs (`TrendResult`, `CorrelationResult`, `SeriesStats`)
//! - artifact descriptors and run configuration (`ChartArtifact`, `RunConfig`)

pub mod types;

pub use types::*;
