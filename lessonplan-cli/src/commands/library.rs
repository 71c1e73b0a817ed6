//! Library management commands

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use lessonplan_core::{Config, FileLibrary, SyllabusRepository};

/// Syllabus library commands
#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommand,
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommand {
    /// Store a syllabus file in the library
    Add {
        /// Syllabus file to store
        file: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List stored syllabi
    #[command(visible_alias = "ls")]
    List,

    /// Delete a stored syllabus
    #[command(visible_alias = "rm")]
    Remove {
        /// Library id
        id: String,
    },
}

impl LibraryArgs {
    /// Execute the library command
    pub fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let library = FileLibrary::new(config.library.resolved_dir());
        if verbose {
            tracing::info!(dir = %library.root().display(), "Using syllabus library");
        }

        match &self.command {
            LibraryCommand::Add { file, name } => add_syllabus(&library, file, name.as_deref()),
            LibraryCommand::List => list_syllabi(&library),
            LibraryCommand::Remove { id } => remove_syllabus(&library, id),
        }
    }
}

fn add_syllabus(
    library: &impl SyllabusRepository,
    file: &Path,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let contents =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let display_name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "syllabus.pdf".to_string()),
    };

    let entry = library.add(&display_name, &contents)?;
    println!("Added {} as {}", entry.display_name, entry.id);
    Ok(())
}

fn list_syllabi(library: &impl SyllabusRepository) -> anyhow::Result<()> {
    let entries = library.list()?;
    if entries.is_empty() {
        println!("No syllabi stored");
        return Ok(());
    }

    println!("{:<40} NAME", "ID");
    for entry in entries {
        println!("{:<40} {}", entry.id, entry.label());
    }
    Ok(())
}

fn remove_syllabus(library: &impl SyllabusRepository, id: &str) -> anyhow::Result<()> {
    if library.remove(id)? {
        println!("Removed {}", id);
    } else {
        println!("No syllabus with id {}", id);
    }
    Ok(())
}
