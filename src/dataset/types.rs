//! Dataset walker core types
//!
//! Contains per-file tasks, outcomes and the error taxonomy of a batch run.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cleanup::{CleanupError, ScaleBarResult};

// ============================================================
// Constants
// ============================================================

/// Default filename prefix for processed outputs
pub const DEFAULT_OUTPUT_PREFIX: &str = "processed_";

/// Extensions selected by the walker (compared case-insensitively)
pub const TIFF_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Suffix appended to the stem of saved debug masks
pub const MASK_SUFFIX: &str = "_mask.png";

// ============================================================
// Error Types
// ============================================================

/// Fatal errors that abort a whole dataset run
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Input folder '{}' does not exist!", .0.display())]
    MissingInput(PathBuf),

    #[error("Directory walk failed: {0}")]
    Walk(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors local to a single file
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Could not read image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cleanup failed: {0}")]
    Cleanup(#[from] CleanupError),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

// ============================================================
// Tasks and Outcomes
// ============================================================

/// One input file and the output path derived for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FileTask {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Path for the saved debug mask: `<output stem>_mask.png`
    pub fn mask_path(&self) -> PathBuf {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output.with_file_name(format!("{}{}", stem, MASK_SUFFIX))
    }
}

/// Per-file result of a dataset run
#[derive(Debug)]
pub enum FileOutcome {
    Success {
        input: PathBuf,
        output: PathBuf,
        result: ScaleBarResult,
    },
    Failure {
        input: PathBuf,
        error: FileError,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Success { input, .. } | FileOutcome::Failure { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Success { input, output, .. } => {
                write!(f, "{} -> {}", input.display(), output.display())
            }
            FileOutcome::Failure { input, error } => {
                write!(f, "FAILED: {} - {}", input.display(), error)
            }
        }
    }
}

/// Aggregated result of a dataset run
#[derive(Debug, Default)]
pub struct DatasetReport {
    pub outcomes: Vec<FileOutcome>,
}

impl DatasetReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::ScaleBarRegion;

    fn success(input: &str, output: &str) -> FileOutcome {
        FileOutcome::Success {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            result: ScaleBarResult {
                region: ScaleBarRegion::default(),
                masked_pixels: 0,
                filled_pixels: 0,
                image_size: (1, 1),
            },
        }
    }

    #[test]
    fn test_outcome_display_success() {
        let outcome = success("in/a.tif", "out/processed_a.tif");
        assert_eq!(outcome.to_string(), "in/a.tif -> out/processed_a.tif");
    }

    #[test]
    fn test_outcome_display_failure() {
        let outcome = FileOutcome::Failure {
            input: PathBuf::from("in/bad.tif"),
            error: FileError::Decode("truncated".to_string()),
        };
        assert_eq!(
            outcome.to_string(),
            "FAILED: in/bad.tif - Could not read image: truncated"
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.input(), Path::new("in/bad.tif"));
    }

    #[test]
    fn test_missing_input_message() {
        let err = DatasetError::MissingInput(PathBuf::from("./Data"));
        assert_eq!(err.to_string(), "Input folder './Data' does not exist!");
    }

    #[test]
    fn test_report_counts() {
        let report = DatasetReport {
            outcomes: vec![
                success("a.tif", "processed_a.tif"),
                FileOutcome::Failure {
                    input: PathBuf::from("b.tif"),
                    error: FileError::Unexpected("boom".to_string()),
                },
                success("c.tif", "processed_c.tif"),
            ],
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_mask_path() {
        let task = FileTask::new("in/x.tif", "out/sub/processed_x.tif");
        assert_eq!(task.mask_path(), PathBuf::from("out/sub/processed_x_mask.png"));
    }

    #[test]
    fn test_file_error_from_io() {
        let err: FileError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, FileError::Io(_)));
    }
}
