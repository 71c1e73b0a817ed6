//! Syllabus text extraction
//!
//! Turns a syllabus document (PDF or plain text) into raw text for
//! [`crate::syllabus::parse`]. Extraction failures are fatal for the
//! document and are not retried.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Where syllabus content comes from
#[derive(Debug, Clone)]
pub enum SyllabusSource {
    /// A file on disk
    Path(PathBuf),
    /// Content already in memory, e.g. an upload
    Bytes(Vec<u8>),
}

impl SyllabusSource {
    /// Read the raw document bytes
    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            SyllabusSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
            SyllabusSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

impl fmt::Display for SyllabusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyllabusSource::Path(path) => write!(f, "{}", path.display()),
            SyllabusSource::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Trait for syllabus text extractors
pub trait TextExtractor {
    /// Get the name of this extractor
    fn name(&self) -> &'static str;

    /// Extract the document's text
    fn extract(&self, source: &SyllabusSource) -> Result<String>;
}

/// PDF extractor backed by `pdf-extract`
///
/// Pages are joined with a single newline; the resulting irregular spacing
/// is cleaned up by normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, source: &SyllabusSource) -> Result<String> {
        let bytes = source.read_bytes()?;

        // pdf-extract can panic on malformed PDFs
        let result =
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes));

        match result {
            Ok(Ok(pages)) => {
                debug!(source = %source, pages = pages.len(), "Extracted PDF text");
                Ok(pages.join("\n"))
            }
            Ok(Err(e)) => Err(Error::Extraction(format!("{}: {}", source, e))),
            Err(_) => Err(Error::Extraction(format!(
                "{}: PDF extraction panicked (malformed file)",
                source
            ))),
        }
    }
}

/// Extractor for syllabi already exported as text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, source: &SyllabusSource) -> Result<String> {
        let bytes = source.read_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Whether the file at `path` starts with the PDF header, or `None` when it
/// cannot be read
fn has_pdf_magic(path: &Path) -> Option<bool> {
    let mut head = Vec::with_capacity(PDF_MAGIC.len());
    std::fs::File::open(path)
        .ok()?
        .take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut head)
        .ok()?;
    Some(head == PDF_MAGIC)
}

/// Pick an extractor for `path`.
///
/// `.txt`/`.text` are plain text and `.pdf` is PDF. Other names are sniffed
/// for the PDF header; unreadable files fall through to the PDF extractor,
/// which reports the IO error.
pub fn extractor_for(path: &Path) -> Box<dyn TextExtractor> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let is_text = match ext.as_deref() {
        Some("txt") | Some("text") => true,
        Some("pdf") => false,
        _ => has_pdf_magic(path) == Some(false),
    };

    if is_text {
        Box::new(PlainTextExtractor)
    } else {
        Box::new(PdfExtractor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_text_from_bytes() {
        let source = SyllabusSource::Bytes("1주 2.23-2.27\nOrientation".as_bytes().to_vec());
        let text = PlainTextExtractor.extract(&source).unwrap();
        assert_eq!(text, "1주 2.23-2.27\nOrientation");
    }

    #[test]
    fn test_plain_text_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "3주 4.1-4.5\nField trip").unwrap();

        let source = SyllabusSource::Path(file.path().to_path_buf());
        let text = PlainTextExtractor.extract(&source).unwrap();
        assert!(text.contains("Field trip"));
    }

    #[test]
    fn test_plain_text_lossy() {
        let source = SyllabusSource::Bytes(vec![b'a', 0xff, b'b']);
        let text = PlainTextExtractor.extract(&source).unwrap();
        assert!(text.starts_with('a'));
        assert!(text.ends_with('b'));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        let source = SyllabusSource::Bytes(b"definitely not a pdf".to_vec());
        let err = PdfExtractor.extract(&source).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = SyllabusSource::Path(PathBuf::from("/nonexistent/syllabus.pdf"));
        assert!(matches!(PdfExtractor.extract(&source), Err(Error::Io(_))));
    }

    #[test]
    fn test_extractor_for_extension() {
        assert_eq!(extractor_for(Path::new("syllabus.txt")).name(), "text");
        assert_eq!(extractor_for(Path::new("SYLLABUS.TXT")).name(), "text");
        assert_eq!(extractor_for(Path::new("syllabus.pdf")).name(), "pdf");
        assert_eq!(extractor_for(Path::new("syllabus")).name(), "pdf");
    }

    #[test]
    fn test_extractor_for_sniffs_unnamed_files() {
        let dir = tempfile::TempDir::new().unwrap();

        let text = dir.path().join("20260301090000_G6_Science");
        std::fs::write(&text, "1주 2.23-2.27\nOrientation\n").unwrap();
        assert_eq!(extractor_for(&text).name(), "text");

        let pdf = dir.path().join("20260301090000_Scan");
        std::fs::write(&pdf, b"%PDF-1.7\n...").unwrap();
        assert_eq!(extractor_for(&pdf).name(), "pdf");

        let short = dir.path().join("tiny");
        std::fs::write(&short, b"%P").unwrap();
        assert_eq!(extractor_for(&short).name(), "text");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(SyllabusSource::Bytes(vec![0; 4]).to_string(), "<4 bytes>");
        assert_eq!(
            SyllabusSource::Path(PathBuf::from("a/b.pdf")).to_string(),
            "a/b.pdf"
        );
    }
}
