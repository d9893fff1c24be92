//! Flat-file outputs: output directories, chart images and the report.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ChartArtifact, ChartKind, ReportDocument};
use crate::error::AppError;

/// Create `dirs` (and parents) if they do not exist yet.
pub fn ensure_dirs<'a>(dirs: impl IntoIterator<Item = &'a Path>) -> Result<(), AppError> {
    for dir in dirs {
        fs::create_dir_all(dir).map_err(|e| AppError::write(dir, e))?;
    }
    Ok(())
}

/// Write rendered image bytes and describe the resulting artifact.
pub fn write_chart_image(path: PathBuf, kind: ChartKind, bytes: &[u8]) -> Result<ChartArtifact, AppError> {
    fs::write(&path, bytes).map_err(|e| AppError::write(&path, e))?;
    Ok(ChartArtifact { file_path: path, kind })
}

/// Write the report into `dir` and return its path.
pub fn write_report(dir: &Path, report: &ReportDocument) -> Result<PathBuf, AppError> {
    let path = dir.join(&report.file_name);
    fs::write(&path, report.content.as_bytes()).map_err(|e| AppError::write(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_dirs_and_writes_files() {
        let root = tempfile::tempdir().unwrap();
        let images = root.path().join("out/chart_images");
        let reports = root.path().join("out/reports");
        ensure_dirs([images.as_path(), reports.as_path()]).unwrap();
        // idempotent
        ensure_dirs([images.as_path()]).unwrap();

        let artifact = write_chart_image(images.join("X_correlation.png"), ChartKind::Correlation, b"png").unwrap();
        assert_eq!(artifact.file_name(), "X_correlation.png");
        assert_eq!(fs::read(&artifact.file_path).unwrap(), b"png");

        let doc = ReportDocument {
            file_name: "X_analysis_report.md".to_string(),
            content: "# X\n".to_string(),
        };
        let path = write_report(&reports, &doc).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# X\n");
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let root = tempfile::tempdir().unwrap();
        let err = write_chart_image(root.path().join("missing/a.png"), ChartKind::TokenAmount, b"x").unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
    }
}
