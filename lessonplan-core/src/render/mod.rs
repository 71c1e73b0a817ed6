//! Lesson-plan rendering
//!
//! Maps week records plus teacher-supplied presentation options onto a
//! fixed plain-text lesson plan and report template.

mod template;

use serde::{Deserialize, Serialize};

pub use template::{
    render_document, render_week, NO_CLASS_PLAN_NOTE, NO_EVENTS_PLACEHOLDER, OPENING_LINE,
    WEEK_SEPARATOR,
};

/// Teacher-supplied fields interpolated into every rendered week
///
/// Every field has a default, so a partial config file or an empty CLI
/// value never fails rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationOptions {
    /// Teacher name
    pub teacher_name: String,

    /// Class or subject label
    pub class_name: String,

    /// Free-form schedule note, e.g. meeting days and times
    pub schedule_note: String,

    /// Materials the teacher prepares
    pub teacher_materials: String,

    /// Materials students bring
    pub student_materials: String,

    /// Prefix the lesson phases with the opening line
    #[serde(alias = "include_prayer")]
    pub include_opening_line: bool,

    /// Subject shown in the header (falls back to the class label)
    pub subject: Option<String>,

    /// Short note on what the teacher plans to do in class
    pub class_plan_note: Option<String>,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            teacher_name: "Teacher Name".to_string(),
            class_name: "Life Science (G6)".to_string(),
            schedule_note: "Tue (10:30–11:10), Thu (09:45–10:25)".to_string(),
            teacher_materials: "Whiteboard marker, slides/handouts, textbook, timer".to_string(),
            student_materials: "Textbook, notebook, pencil, highlighter".to_string(),
            include_opening_line: false,
            subject: None,
            class_plan_note: None,
        }
    }
}

impl PresentationOptions {
    /// Subject override, or the class label when unset or blank
    pub fn subject_line(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.class_name.as_str())
    }

    /// Trimmed class-plan note, or the placeholder when unset or blank
    pub fn class_plan_line(&self) -> &str {
        self.class_plan_note
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_CLASS_PLAN_NOTE)
    }
}

/// File stem for a single-week draft, e.g. "life_science_week_3_lesson_plan_report"
pub fn draft_file_stem(subject: &str, week_no: u32) -> String {
    format!(
        "{}_week_{}_lesson_plan_report",
        subject.to_lowercase().replace(' ', "_"),
        week_no
    )
}
