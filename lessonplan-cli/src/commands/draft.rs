//! Draft command - Write a single-week plan from a stored syllabus

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lessonplan_core::{
    draft_file_stem, render_week, select_week, Config, ConfigOverrides, FileLibrary,
    SyllabusRepository,
};

use super::read_weeks;

/// Arguments for the draft command
#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Id of a syllabus stored in the library
    #[arg(long)]
    pub library_id: String,

    /// Week number to draft
    #[arg(short, long)]
    pub week: u32,

    /// Subject shown in the header and file name
    #[arg(long)]
    pub subject: Option<String>,

    /// What you plan to do in class
    #[arg(long)]
    pub class_plan: Option<String>,

    /// Directory the draft is written to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl DraftArgs {
    /// Configuration values supplied by this command's flags
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            subject: self.subject.clone(),
            class_plan_note: self.class_plan.clone(),
            ..Default::default()
        }
    }

    /// Execute the draft command
    pub fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let library = FileLibrary::new(config.library.resolved_dir());
        let entry = library.get(&self.library_id)?;
        let weeks = read_weeks(&library.path_of(&entry))?;

        let selected = select_week(&weeks, self.week)?;
        if selected.len() > 1 {
            tracing::warn!(
                week = self.week,
                matches = selected.len(),
                "Syllabus repeats this week number, drafting the first"
            );
        }
        let week = &selected[0];

        let options = &config.presentation;
        let text = render_week(week, options);

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let path = self
            .output_dir
            .join(format!("{}.txt", draft_file_stem(options.subject_line(), week.week_no)));
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if verbose {
            tracing::info!(syllabus = %entry.label(), week = %week.label(), "Rendered draft");
        }
        println!("Saved draft to: {}", path.display());
        Ok(())
    }
}
