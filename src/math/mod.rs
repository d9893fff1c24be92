//! Statistics: OLS trend line, Pearson correlation and descriptive summaries.

pub mod correlation;
pub mod ols;
pub mod summary;

pub use correlation::*;
pub use ols::*;
pub use summary::*;
