//! Lessonplan Core - Syllabus segmentation and lesson-plan rendering
//!
//! This crate turns the text of a syllabus document into per-week records
//! and renders those records into weekly lesson-plan drafts.

pub mod config;
pub mod error;
pub mod extract;
pub mod library;
pub mod render;
pub mod syllabus;

pub use config::{Config, ConfigOverrides, DocumentConfig, LibraryConfig, PublishConfig};
pub use error::{Error, Result};
pub use extract::{extractor_for, PdfExtractor, PlainTextExtractor, SyllabusSource, TextExtractor};
pub use library::{sanitize_filename, FileLibrary, SyllabusEntry, SyllabusRepository};
pub use render::{draft_file_stem, render_document, render_week, PresentationOptions};
pub use syllabus::{normalize, parse, require_weeks, select_week, WeekRecord};
