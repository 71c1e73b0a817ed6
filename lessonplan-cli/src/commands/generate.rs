//! Generate command - Render a syllabus into a weekly plan document

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lessonplan_core::{render_document, select_week, Config, ConfigOverrides};
use lessonplan_publish::{DocumentPublisher, GoogleDocsPublisher};

use super::read_weeks;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the syllabus PDF (or a .txt export)
    #[arg(long)]
    pub syllabus: PathBuf,

    /// Output text file (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    pub doc_title: Option<String>,

    /// Teacher name shown in each plan
    #[arg(long)]
    pub teacher_name: Option<String>,

    /// Class label shown in each plan
    #[arg(long)]
    pub class_name: Option<String>,

    /// Meeting days and times
    #[arg(long)]
    pub schedule_note: Option<String>,

    /// Materials the teacher prepares
    #[arg(long)]
    pub teacher_materials: Option<String>,

    /// Materials students bring
    #[arg(long)]
    pub student_materials: Option<String>,

    /// Start the lesson phases with the opening line
    #[arg(long)]
    pub include_prayer: bool,

    /// Subject shown in the header (defaults to the class label)
    #[arg(long)]
    pub subject: Option<String>,

    /// What you plan to do in class
    #[arg(long)]
    pub class_plan: Option<String>,

    /// Only generate this week number
    #[arg(short, long)]
    pub week: Option<u32>,

    /// Also publish the document to Google Docs
    #[arg(long)]
    pub post_gdoc: bool,

    /// Google Drive folder ID (shared drives supported)
    #[arg(long)]
    pub drive_folder_id: Option<String>,

    /// OAuth Desktop App client credentials
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Cached OAuth token file
    #[arg(long)]
    pub token: Option<PathBuf>,

    /// Service account key file (skips the browser flow)
    #[arg(long)]
    pub service_account: Option<PathBuf>,
}

impl GenerateArgs {
    /// Configuration values supplied by this command's flags
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            teacher_name: self.teacher_name.clone(),
            class_name: self.class_name.clone(),
            schedule_note: self.schedule_note.clone(),
            teacher_materials: self.teacher_materials.clone(),
            student_materials: self.student_materials.clone(),
            include_opening_line: self.include_prayer.then_some(true),
            subject: self.subject.clone(),
            class_plan_note: self.class_plan.clone(),
            title: self.doc_title.clone(),
            output: self.output.clone(),
            folder_id: self.drive_folder_id.clone(),
            credentials_path: self.credentials.clone(),
            token_path: self.token.clone(),
            service_account_path: self.service_account.clone(),
            ..Default::default()
        }
    }

    /// Execute the generate command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let weeks = read_weeks(&self.syllabus)?;

        let selected = match self.week {
            Some(week_no) => select_week(&weeks, week_no)?,
            None => weeks,
        };

        if verbose {
            tracing::info!(
                weeks = selected.len(),
                title = %config.document.title,
                "Rendering document"
            );
        }

        let text = render_document(&selected, &config.document.title, &config.presentation);

        let output = &config.document.output;
        std::fs::write(output, &text)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Saved generated plan/report to: {}", output.display());

        if self.post_gdoc {
            let publisher = GoogleDocsPublisher::from_config(&config.publish)?;
            let doc = publisher.publish(&config.document.title, &text).await?;
            println!("Published Google Doc: {}", doc.url);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(syllabus: PathBuf, output: PathBuf) -> GenerateArgs {
        GenerateArgs {
            syllabus,
            output: Some(output),
            doc_title: None,
            teacher_name: None,
            class_name: None,
            schedule_note: None,
            teacher_materials: None,
            student_materials: None,
            include_prayer: false,
            subject: None,
            class_plan: None,
            week: None,
            post_gdoc: false,
            drive_folder_id: None,
            credentials: None,
            token: None,
            service_account: None,
        }
    }

    fn write_syllabus(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("syllabus.txt");
        std::fs::write(
            &path,
            "1주 2.23-2.27\nOrientation\nTBD\n2주 3.2-3.6\nCells\n2A ,2B\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_include_prayer_only_overrides_when_set() {
        let mut a = args(PathBuf::from("s.pdf"), PathBuf::from("out.txt"));
        assert_eq!(a.overrides().include_opening_line, None);

        a.include_prayer = true;
        assert_eq!(a.overrides().include_opening_line, Some(true));
    }

    #[tokio::test]
    async fn test_generate_writes_selected_week() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("plan.txt");
        let mut a = args(write_syllabus(&dir), output.clone());
        a.week = Some(2);
        a.doc_title = Some("Spring Plan".to_string());

        let config = Config::default().with_cli_overrides(a.overrides());
        a.execute(false, &config).await.unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Spring Plan\n"));
        assert!(text.contains("Week 2 (3.2-3.6)"));
        assert!(text.contains("2A, 2B"));
        assert!(!text.contains("Week 1 (2.23-2.27)"));
    }

    #[tokio::test]
    async fn test_generate_unknown_week() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("plan.txt");
        let mut a = args(write_syllabus(&dir), output.clone());
        a.week = Some(9);

        let config = Config::default().with_cli_overrides(a.overrides());
        assert!(a.execute(false, &config).await.is_err());
        assert!(!output.exists());
    }
}
