//! `docwarden init`

use crate::cli::InitArgs;
use crate::docs::init::{run_init, InitOptions};
use crate::report::terminal::{self, Palette};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DocwardenResult;
use crate::{CommandStatus, DocwardenCommand};

/// Bootstraps metadata and the project config.
pub struct InitCommand;

/// Typed options for [`InitCommand`].
#[derive(Clone, Debug)]
pub struct InitCommandOptions {
    /// Engine options.
    pub init: InitOptions,
    /// Terminal styling.
    pub palette: Palette,
}

impl DocwardenCommand for InitCommand {
    type Args = InitArgs;
    type Options = InitCommandOptions;

    fn parse(args: Self::Args, palette: Palette) -> DocwardenResult<Self::Options> {
        Ok(InitCommandOptions {
            init: InitOptions {
                dry_run: args.dry_run,
                skip_frontmatter: args.no_frontmatter,
                docs_dir: args.docs_dir,
            },
            palette,
        })
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DocwardenResult<CommandStatus> {
        let summary = run_init(ctx, &options.init)?;
        println!("{}", terminal::render_init(&summary, options.palette));
        Ok(CommandStatus::Success)
    }
}
