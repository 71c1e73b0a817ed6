//! Configuration management for lesson-plan generation
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (LESSONPLAN_*)
//! 3. Config file (~/.config/lessonplan/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::PresentationOptions;
use crate::{Error, Result};

/// Generated document settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Title placed at the top of the generated document
    pub title: String,

    /// Where the generated text is written
    pub output: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "G6 Life Science — Weekly Lesson Plan & Report (Auto)".to_string(),
            output: PathBuf::from("weekly_lesson_plan_report.txt"),
        }
    }
}

/// Syllabus library settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library directory (defaults to the platform data dir)
    pub dir: Option<PathBuf>,
}

impl LibraryConfig {
    /// Resolved library directory
    ///
    /// Returns `~/.local/share/lessonplan` on Linux when unset
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("lessonplan"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }
}

/// Google Docs publishing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Drive folder to create documents in ("root" is My Drive)
    pub folder_id: String,

    /// OAuth Desktop App client credentials
    pub credentials_path: PathBuf,

    /// Cached OAuth token written after the consent flow
    pub token_path: PathBuf,

    /// Service account key; when set, the interactive flow is skipped
    pub service_account_path: Option<PathBuf>,

    /// Timeout for each Google API request
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            folder_id: "root".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            service_account_path: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Values supplied on the command line; `None` leaves the loaded value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub teacher_name: Option<String>,
    pub class_name: Option<String>,
    pub schedule_note: Option<String>,
    pub teacher_materials: Option<String>,
    pub student_materials: Option<String>,
    pub include_opening_line: Option<bool>,
    pub subject: Option<String>,
    pub class_plan_note: Option<String>,
    pub title: Option<String>,
    pub output: Option<PathBuf>,
    pub library_dir: Option<PathBuf>,
    pub folder_id: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub token_path: Option<PathBuf>,
    pub service_account_path: Option<PathBuf>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Fields interpolated into rendered plans
    pub presentation: PresentationOptions,

    /// Generated document settings
    pub document: DocumentConfig,

    /// Syllabus library settings
    pub library: LibraryConfig,

    /// Google Docs publishing settings
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/lessonplan/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lessonplan").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - LESSONPLAN_TEACHER_NAME: Teacher name
    /// - LESSONPLAN_CLASS_NAME: Class label
    /// - LESSONPLAN_LIBRARY_DIR: Syllabus library directory
    /// - LESSONPLAN_DRIVE_FOLDER_ID: Drive folder for published documents
    /// - LESSONPLAN_SERVICE_ACCOUNT: Service account key file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = std::env::var("LESSONPLAN_TEACHER_NAME") {
            self.presentation.teacher_name = name;
        }

        if let Ok(class) = std::env::var("LESSONPLAN_CLASS_NAME") {
            self.presentation.class_name = class;
        }

        if let Ok(dir) = std::env::var("LESSONPLAN_LIBRARY_DIR") {
            self.library.dir = Some(PathBuf::from(dir));
        }

        if let Ok(folder) = std::env::var("LESSONPLAN_DRIVE_FOLDER_ID") {
            self.publish.folder_id = folder;
        }

        if let Ok(key) = std::env::var("LESSONPLAN_SERVICE_ACCOUNT") {
            self.publish.service_account_path = Some(PathBuf::from(key));
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let presentation = &mut self.presentation;
        if let Some(name) = overrides.teacher_name {
            presentation.teacher_name = name;
        }
        if let Some(class) = overrides.class_name {
            presentation.class_name = class;
        }
        if let Some(note) = overrides.schedule_note {
            presentation.schedule_note = note;
        }
        if let Some(materials) = overrides.teacher_materials {
            presentation.teacher_materials = materials;
        }
        if let Some(materials) = overrides.student_materials {
            presentation.student_materials = materials;
        }
        if let Some(include) = overrides.include_opening_line {
            presentation.include_opening_line = include;
        }
        if overrides.subject.is_some() {
            presentation.subject = overrides.subject;
        }
        if overrides.class_plan_note.is_some() {
            presentation.class_plan_note = overrides.class_plan_note;
        }

        if let Some(title) = overrides.title {
            self.document.title = title;
        }
        if let Some(output) = overrides.output {
            self.document.output = output;
        }

        if overrides.library_dir.is_some() {
            self.library.dir = overrides.library_dir;
        }

        if let Some(folder) = overrides.folder_id {
            self.publish.folder_id = folder;
        }
        if let Some(path) = overrides.credentials_path {
            self.publish.credentials_path = path;
        }
        if let Some(path) = overrides.token_path {
            self.publish.token_path = path;
        }
        if overrides.service_account_path.is_some() {
            self.publish.service_account_path = overrides.service_account_path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults. An explicit
    /// `config_path` replaces the default file location.
    pub fn load_with_overrides(
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };
        Ok(base.with_env_overrides().with_cli_overrides(overrides))
    }
}
