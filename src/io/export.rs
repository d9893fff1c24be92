//! Export chart specs to JSON.
//!
//! Handy for inspecting exactly what was handed to the renderer, or for feeding
//! the same charts to a different rendering service.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::chart::ChartSpec;
use crate::error::AppError;

/// Write all chart specs as a pretty-printed JSON array.
pub fn write_chart_specs_json(path: &Path, specs: &[ChartSpec]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, specs).map_err(|e| AppError::write(path, e))?;
    writeln!(writer).map_err(|e| AppError::write(path, e))?;
    writer.flush().map_err(|e| AppError::write(path, e))?;

    Ok(())
}
