//! CLI command implementations

pub mod draft;
pub mod generate;
pub mod library;
pub mod weeks;

pub use draft::DraftArgs;
pub use generate::GenerateArgs;
pub use library::LibraryArgs;
pub use weeks::WeeksArgs;

use std::path::Path;

use anyhow::Context;
use lessonplan_core::{extractor_for, parse, require_weeks, SyllabusSource, WeekRecord};

/// Extract, normalize and segment a syllabus file.
///
/// Fails when the file is missing, extraction fails, or no week header
/// is found.
pub(crate) fn read_weeks(path: &Path) -> anyhow::Result<Vec<WeekRecord>> {
    if !path.exists() {
        anyhow::bail!("Syllabus not found: {}", path.display());
    }

    let extractor = extractor_for(path);
    let source = SyllabusSource::Path(path.to_path_buf());
    let text = extractor
        .extract(&source)
        .with_context(|| format!("Failed to read syllabus {}", path.display()))?;

    let weeks = require_weeks(parse(&text))?;
    tracing::info!(
        syllabus = %path.display(),
        extractor = extractor.name(),
        weeks = weeks.len(),
        "Parsed syllabus"
    );
    Ok(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_weeks_from_text_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("syllabus.txt");
        std::fs::write(&path, "1주 2.23-2.27\nOrientation\nTBD\n2주 3.2-3.6\nLab safety\n").unwrap();

        let weeks = read_weeks(&path).unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].events, vec!["Orientation"]);
        assert_eq!(weeks[1].details, "TBD");
    }

    #[test]
    fn test_read_weeks_missing_file() {
        let err = read_weeks(Path::new("/nonexistent/syllabus.pdf")).unwrap_err();
        assert!(err.to_string().contains("Syllabus not found"));
    }

    #[test]
    fn test_read_weeks_without_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Course overview\nNo schedule here\n").unwrap();

        assert!(read_weeks(&path).is_err());
    }
}
