//! Charts: declarative specs (`spec`) and the renderer capability (`render`).
//!
//! The split keeps chart content testable without rasterizing anything.

pub mod render;
pub mod spec;

pub use render::*;
pub use spec::*;
