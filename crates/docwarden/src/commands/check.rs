//! `docwarden check`

use crate::cli::CheckArgs;
use crate::docs::index::check_file;
use crate::report::terminal::{self, Palette};
use crate::report::{json, ReportFormat};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DocwardenResult;
use crate::{CommandStatus, DocwardenCommand};

/// Lists docs affected by a change to one source file.
pub struct CheckCommand;

/// Typed options for [`CheckCommand`].
#[derive(Clone, Debug)]
pub struct CheckCommandOptions {
    /// File to look up.
    pub file: String,
    /// Stay silent when nothing matches.
    pub quiet: bool,
    /// Output format.
    pub format: ReportFormat,
    /// Terminal styling.
    pub palette: Palette,
}

impl DocwardenCommand for CheckCommand {
    type Args = CheckArgs;
    type Options = CheckCommandOptions;

    fn parse(args: Self::Args, palette: Palette) -> DocwardenResult<Self::Options> {
        Ok(CheckCommandOptions {
            file: args.file,
            quiet: args.quiet,
            format: args.format.into(),
            palette,
        })
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DocwardenResult<CommandStatus> {
        let result = check_file(ctx, &options.file)?;
        if result.affected_docs.is_empty() && options.quiet {
            return Ok(CommandStatus::Success);
        }
        match options.format {
            ReportFormat::Json => println!("{}", json::render_check(&result)?),
            _ if result.affected_docs.is_empty() => {
                eprintln!("docwarden: no docs reference {}", result.source_file);
            }
            _ => println!("{}", terminal::render_check(&result, options.palette)),
        }
        Ok(CommandStatus::Success)
    }
}
