//! Weeks command - List the week records found in a syllabus

use std::path::PathBuf;

use clap::Args;
use lessonplan_core::{Config, FileLibrary, SyllabusRepository, WeekRecord};

use super::read_weeks;

/// Arguments for the weeks command
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["syllabus", "library_id"])))]
pub struct WeeksArgs {
    /// Path to a syllabus file
    #[arg(long)]
    pub syllabus: Option<PathBuf>,

    /// Id of a syllabus stored in the library
    #[arg(long)]
    pub library_id: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

impl WeeksArgs {
    /// Execute the weeks command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let path = match (&self.syllabus, &self.library_id) {
            (Some(path), _) => path.clone(),
            (None, Some(id)) => {
                let library = FileLibrary::new(config.library.resolved_dir());
                let entry = library.get(id)?;
                library.path_of(&entry)
            }
            (None, None) => anyhow::bail!("Either --syllabus or --library-id is required"),
        };

        let weeks = read_weeks(&path)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&weeks)?);
        } else {
            print!("{}", format_weeks(&weeks));
        }

        Ok(())
    }
}

/// One block per week: label, events, then sections
fn format_weeks(weeks: &[WeekRecord]) -> String {
    let mut out = String::new();
    for week in weeks {
        out.push_str(&week.label());
        out.push('\n');
        for event in &week.events {
            out.push_str(&format!("  - {}\n", event));
        }
        out.push_str(&format!("  Sections: {}\n", week.details));
    }
    out
}
