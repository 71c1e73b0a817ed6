//! Lessonplan CLI - Command line interface for lesson-plan generation
//!
//! Turns a school syllabus into weekly lesson plan and report drafts.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lessonplan_core::{Config, ConfigOverrides};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{DraftArgs, GenerateArgs, LibraryArgs, WeeksArgs};

/// Lessonplan: weekly lesson plans from a syllabus
#[derive(Parser, Debug)]
#[command(name = "lessonplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/lessonplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Syllabus library directory (overrides config and env)
    #[arg(long, global = true)]
    library_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Generate a lesson plan document from a syllabus
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),

    /// List the weeks found in a syllabus
    Weeks(WeeksArgs),

    /// Manage stored syllabi
    #[command(visible_alias = "lib")]
    Library(LibraryArgs),

    /// Write a single-week draft from a stored syllabus
    Draft(DraftArgs),

    /// Show current configuration
    Config,
}

impl Cli {
    /// Configuration values supplied on the command line
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = match &self.command {
            Some(Commands::Generate(args)) => args.overrides(),
            Some(Commands::Draft(args)) => args.overrides(),
            _ => ConfigOverrides::default(),
        };
        overrides.library_dir = self.library_dir.clone();
        overrides
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::load_with_overrides(cli.config.as_deref(), cli.overrides())?;

    if cli.verbose {
        tracing::info!(
            teacher = %config.presentation.teacher_name,
            class = %config.presentation.class_name,
            library = %config.library.resolved_dir().display(),
            folder_id = %config.publish.folder_id,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("lessonplan {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Generate(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Weeks(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Library(args)) => {
            args.execute(cli.verbose, &config)?;
        }
        Some(Commands::Draft(args)) => {
            args.execute(cli.verbose, &config)?;
        }
        Some(Commands::Config) => {
            print_config(&config, cli.config.as_deref());
        }
        None => {
            println!("Lessonplan - Weekly lesson plans from a syllabus");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config, explicit_path: Option<&std::path::Path>) {
    let presentation = &config.presentation;
    println!("Lessonplan Configuration");
    println!("========================");
    println!();
    println!("Presentation:");
    println!("  teacher_name: {}", presentation.teacher_name);
    println!("  class_name: {}", presentation.class_name);
    println!("  schedule_note: {}", presentation.schedule_note);
    println!("  teacher_materials: {}", presentation.teacher_materials);
    println!("  student_materials: {}", presentation.student_materials);
    println!("  include_opening_line: {}", presentation.include_opening_line);
    println!("  subject: {}", presentation.subject_line());
    println!();
    println!("Document:");
    println!("  title: {}", config.document.title);
    println!("  output: {}", config.document.output.display());
    println!();
    println!("Library:");
    println!("  dir: {}", config.library.resolved_dir().display());
    println!();
    println!("Publish:");
    println!("  folder_id: {}", config.publish.folder_id);
    println!("  credentials: {}", config.publish.credentials_path.display());
    println!("  token: {}", config.publish.token_path.display());
    println!(
        "  service_account: {}",
        config
            .publish
            .service_account_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("  timeout: {:?}", config.publish.timeout);
    println!();

    let path = explicit_path
        .map(std::path::Path::to_path_buf)
        .or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
