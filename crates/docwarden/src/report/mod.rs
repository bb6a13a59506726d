//! Report renderers for command results.

pub mod json;
pub mod markdown;
pub mod terminal;

use clap::ValueEnum;
use std::env;

/// Output format accepted by `check` and `audit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored, human-readable text.
    #[default]
    Terminal,
    /// Pretty-printed JSON.
    Json,
    /// Markdown tables.
    Markdown,
}

/// Whether ANSI colors should be emitted.
///
/// `NO_COLOR` disables colors regardless of its value, as does `--no-color`.
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && env::var_os("NO_COLOR").is_none()
}
