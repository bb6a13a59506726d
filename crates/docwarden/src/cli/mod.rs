//! Command-line definitions for the `docwarden` binary.

use crate::report::ReportFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Keep documentation in sync with the source files it describes.
#[derive(Debug, Parser)]
#[command(name = "docwarden", version)]
pub struct Cli {
    /// Project root. Defaults to the nearest ancestor containing .git, package.json or Cargo.toml.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log per-file decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: TopLevelCommand,
}

/// Top-level command families.
#[derive(Debug, Subcommand)]
pub enum TopLevelCommand {
    /// Scan docs, write metadata, and create the project config.
    Init(InitArgs),
    /// List docs that reference a source file.
    Check(CheckArgs),
    /// Full documentation health audit.
    Audit(AuditArgs),
}

/// Arguments for `docwarden init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Preview changes without modifying files.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip writing metadata into documents.
    #[arg(long)]
    pub no_frontmatter: bool,

    /// Documentation directory (default: ./docs).
    #[arg(long, value_name = "PATH")]
    pub docs_dir: Option<String>,
}

/// Output formats supported by `check`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    /// Colored, human-readable text.
    #[default]
    Terminal,
    /// Pretty-printed JSON.
    Json,
}

impl From<CheckFormat> for ReportFormat {
    fn from(format: CheckFormat) -> Self {
        match format {
            CheckFormat::Terminal => ReportFormat::Terminal,
            CheckFormat::Json => ReportFormat::Json,
        }
    }
}

/// Arguments for `docwarden check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Source file to check, relative to the project root or absolute.
    #[arg(long, value_name = "PATH")]
    pub file: String,

    /// Print nothing when no docs reference the file.
    #[arg(long)]
    pub quiet: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = CheckFormat::Terminal)]
    pub format: CheckFormat,
}

/// Arguments for `docwarden audit`.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Terminal)]
    pub format: ReportFormat,

    /// Skip git history and use filesystem timestamps.
    #[arg(long)]
    pub no_git: bool,
}
