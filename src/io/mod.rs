//! Input/output helpers.
//!
//! - quotes CSV ingest (`ingest`)
//! - images, report and output directories (`output`)
//! - chart spec JSON export (`export`)

pub mod export;
pub mod ingest;
pub mod output;

pub use export::*;
pub use ingest::*;
pub use output::*;
