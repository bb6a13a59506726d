//! Documentation reference tracking and audits (`docwarden`).
//!
//! The crate is a small CLI layer over a documentation engine. [`docs`] owns extraction,
//! metadata, scanning, indexing and auditing; [`runtime`] owns configuration, process execution,
//! logging and the shared [`CommandContext`]; [`report`] renders results; [`commands`] wires the
//! three subcommands together.

pub mod cli;
pub mod commands;
pub mod docs;
pub mod report;
pub mod runtime;

use crate::cli::{Cli, TopLevelCommand};
use crate::commands::{AuditCommand, CheckCommand, InitCommand};
use crate::report::terminal::Palette;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{DocwardenResult, FAILURE_EXIT_CODE};
use clap::Parser;
use std::process::ExitCode;

/// Outcome of a command that ran to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    /// Nothing to report.
    Success,
    /// The command finished but its result fails a gate.
    Failed,
}

/// Shared command contract for docwarden subcommands.
///
/// [`DocwardenCommand::parse`] translates parsed CLI arguments into typed options without side
/// effects; all filesystem and process work happens in [`DocwardenCommand::run`] through the
/// shared [`CommandContext`].
pub trait DocwardenCommand {
    /// Parsed CLI arguments for the subcommand.
    type Args;
    /// Typed options the command runs with.
    type Options;

    /// Turn CLI arguments into typed options.
    fn parse(args: Self::Args, palette: Palette) -> DocwardenResult<Self::Options>;

    /// Execute the command.
    fn run(ctx: &CommandContext, options: Self::Options) -> DocwardenResult<CommandStatus>;
}

/// Run the `docwarden` binary using the current process arguments.
pub fn execute_from_env() -> DocwardenResult<CommandStatus> {
    let cli = Cli::parse();
    runtime::logging::init(cli.verbose);

    let palette = Palette::new(report::color_enabled(cli.no_color));
    let ctx = CommandContext::discover(cli.root.as_deref())?;

    match cli.command {
        TopLevelCommand::Init(args) => InitCommand::run(&ctx, InitCommand::parse(args, palette)?),
        TopLevelCommand::Check(args) => {
            CheckCommand::run(&ctx, CheckCommand::parse(args, palette)?)
        }
        TopLevelCommand::Audit(args) => {
            AuditCommand::run(&ctx, AuditCommand::parse(args, palette)?)
        }
    }
}

/// Map a command result to the process exit code.
///
/// `0` on success, `1` for failed gates and errors, `2` when the environment (such as a missing
/// project root) prevents running at all.
pub fn exit_code(result: DocwardenResult<CommandStatus>) -> ExitCode {
    match result {
        Ok(CommandStatus::Success) => ExitCode::SUCCESS,
        Ok(CommandStatus::Failed) => ExitCode::from(FAILURE_EXIT_CODE),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.category.exit_code())
        }
    }
}
