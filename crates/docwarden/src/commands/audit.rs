//! `docwarden audit`

use crate::cli::AuditArgs;
use crate::docs::audit::{run_audit, AuditOptions};
use crate::report::terminal::{self, Palette};
use crate::report::{json, markdown, ReportFormat};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DocwardenResult;
use crate::{CommandStatus, DocwardenCommand};

/// Full documentation health audit; fails CI when the score drops below 50.
pub struct AuditCommand;

/// Typed options for [`AuditCommand`].
#[derive(Clone, Debug)]
pub struct AuditCommandOptions {
    /// Engine options.
    pub audit: AuditOptions,
    /// Output format.
    pub format: ReportFormat,
    /// Terminal styling.
    pub palette: Palette,
}

impl DocwardenCommand for AuditCommand {
    type Args = AuditArgs;
    type Options = AuditCommandOptions;

    fn parse(args: Self::Args, palette: Palette) -> DocwardenResult<Self::Options> {
        Ok(AuditCommandOptions {
            audit: AuditOptions {
                use_git: !args.no_git,
            },
            format: args.format,
            palette,
        })
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DocwardenResult<CommandStatus> {
        let result = run_audit(ctx, options.audit)?;
        let rendered = match options.format {
            ReportFormat::Terminal => terminal::render_audit(&result, options.palette),
            ReportFormat::Json => json::render_audit(&result)?,
            ReportFormat::Markdown => markdown::render_audit(&result),
        };
        println!("{rendered}");

        if result.is_failing() {
            Ok(CommandStatus::Failed)
        } else {
            Ok(CommandStatus::Success)
        }
    }
}
