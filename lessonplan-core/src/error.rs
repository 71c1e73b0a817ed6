//! Error types for lesson-plan generation

use thiserror::Error;

/// Result type alias for lesson-plan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lesson-plan operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text could not be extracted from a syllabus document
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The syllabus text contained no week headers
    #[error(
        "No week rows found in syllabus. Check the document format \
         (expected a header like '1주 2.23-2.27')"
    )]
    NoWeeksFound,

    /// The requested week does not appear in the syllabus
    #[error("Week {0} not found in syllabus")]
    WeekNotFound(u32),

    /// Syllabus library error
    #[error("Library error: {0}")]
    Library(String),
}
