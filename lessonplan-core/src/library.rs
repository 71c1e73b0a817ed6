//! Syllabus library
//!
//! A flat, file-backed collection of uploaded syllabus documents. Stored
//! files live under `<dir>/syllabi/` and a JSON index at
//! `<dir>/syllabi_index.json` lists them. Callers work through the
//! [`SyllabusRepository`] trait; the parsing core never touches storage.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Error, Result};

const SYLLABI_DIR: &str = "syllabi";
const INDEX_FILE: &str = "syllabi_index.json";

/// An uploaded syllabus in the library index
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SyllabusEntry {
    /// Stable identifier (same as `stored_name`)
    pub id: String,
    /// Name the file was uploaded with
    pub display_name: String,
    /// File name under the syllabi directory
    pub stored_name: String,
    /// Upload time, local ISO-8601 to the second
    pub uploaded_at: String,
}

impl SyllabusEntry {
    /// An entry is usable only when every field is present
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.display_name.is_empty()
            && !self.stored_name.is_empty()
            && !self.uploaded_at.is_empty()
    }

    /// Display label, e.g. "syllabus.pdf (uploaded 2026-03-01T09:00:00)"
    pub fn label(&self) -> String {
        format!("{} (uploaded {})", self.display_name, self.uploaded_at)
    }
}

/// Repository of uploaded syllabus documents
pub trait SyllabusRepository {
    /// All valid entries, in upload order
    fn list(&self) -> Result<Vec<SyllabusEntry>>;

    /// Store a new document and record it in the index
    fn add(&self, display_name: &str, contents: &[u8]) -> Result<SyllabusEntry>;

    /// Remove entries with `id` and their stored files; returns whether any existed
    fn remove(&self, id: &str) -> Result<bool>;

    /// Path of the stored document for `entry`
    fn path_of(&self, entry: &SyllabusEntry) -> PathBuf;

    /// Look up a single entry by id
    fn get(&self, id: &str) -> Result<SyllabusEntry> {
        self.list()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::Library(format!("No syllabus with id '{}'", id)))
    }
}

/// [`SyllabusRepository`] backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FileLibrary {
    root: PathBuf,
}

impl FileLibrary {
    /// Create a library rooted at `root` (created lazily)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn syllabi_dir(&self) -> PathBuf {
        self.root.join(SYLLABI_DIR)
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Create the storage directory and an empty index if missing
    pub fn ensure_storage(&self) -> Result<()> {
        std::fs::create_dir_all(self.syllabi_dir())?;
        let index_path = self.index_path();
        if !index_path.exists() {
            std::fs::write(&index_path, "[]")?;
            debug!(path = %index_path.display(), "Created syllabus index");
        }
        Ok(())
    }

    /// Read the raw index; a corrupt index reads as empty
    fn load_index(&self) -> Result<Vec<serde_json::Value>> {
        self.ensure_storage()?;
        let contents = std::fs::read_to_string(self.index_path())?;
        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(error = %e, "Syllabus index is unreadable, treating it as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save_index(&self, items: &[serde_json::Value]) -> Result<()> {
        let contents = serde_json::to_string_pretty(items)?;
        std::fs::write(self.index_path(), contents)?;
        Ok(())
    }
}

impl SyllabusRepository for FileLibrary {
    fn list(&self) -> Result<Vec<SyllabusEntry>> {
        let entries = self
            .load_index()?
            .into_iter()
            .filter_map(|item| serde_json::from_value::<SyllabusEntry>(item).ok())
            .filter(SyllabusEntry::is_valid)
            .collect();
        Ok(entries)
    }

    fn add(&self, display_name: &str, contents: &[u8]) -> Result<SyllabusEntry> {
        let mut index = self.load_index()?;
        let now = Local::now();

        let stored_name = format!(
            "{}_{}",
            now.format("%Y%m%d%H%M%S"),
            sanitize_filename(display_name)
        );
        let path = self.syllabi_dir().join(&stored_name);
        std::fs::write(&path, contents)?;

        let entry = SyllabusEntry {
            id: stored_name.clone(),
            display_name: display_name.to_string(),
            stored_name,
            uploaded_at: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        };
        index.push(serde_json::to_value(&entry)?);
        self.save_index(&index)?;

        info!(id = %entry.id, bytes = contents.len(), "Added syllabus to library");
        Ok(entry)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let index = self.load_index()?;
        let (removed, kept): (Vec<_>, Vec<_>) = index
            .into_iter()
            .partition(|item| item.get("id").and_then(|v| v.as_str()) == Some(id));

        for item in &removed {
            let Some(stored_name) = item.get("stored_name").and_then(|v| v.as_str()) else {
                continue;
            };
            let path = self.syllabi_dir().join(stored_name);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Deleted stored syllabus"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }

        self.save_index(&kept)?;

        if !removed.is_empty() {
            info!(id = %id, "Removed syllabus from library");
        }
        Ok(!removed.is_empty())
    }

    fn path_of(&self, entry: &SyllabusEntry) -> PathBuf {
        self.syllabi_dir().join(&entry.stored_name)
    }
}

fn unsafe_filename_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("valid filename regex"))
}

/// Make an uploaded file name safe to store.
///
/// Runs of characters outside `[A-Za-z0-9._-]` become `_` and surrounding
/// underscores are stripped; an empty result becomes "syllabus.pdf".
pub fn sanitize_filename(name: &str) -> String {
    let replaced = unsafe_filename_chars_re().replace_all(name, "_");
    let safe = replaced.trim_matches('_');
    if safe.is_empty() {
        "syllabus.pdf".to_string()
    } else {
        safe.to_string()
    }
}
