//! Command-level failures of `docwarden init`, `check` and `audit`.
//!
//! Most problems a documentation scan meets are absorbed where they happen: a broken
//! frontmatter block reads as "no metadata", a git failure for one reference falls back to that
//! file's mtime, and a broken `.docwarden.json` resolves to defaults. What is left, and reaches
//! [`crate::exit_code`] through [`DocwardenError`], is whatever stops a command from producing a
//! report at all.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Exit status for a command that could not run in the current directory.
pub const ENVIRONMENT_EXIT_CODE: u8 = 2;
/// Exit status for every other failure, and for an audit below the health gate.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// What kind of problem stopped a docwarden command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocwardenErrorCategory {
    /// `.docwarden.json` could not be serialized or the reference patterns built from it are
    /// unusable.
    Config,
    /// No project root was found, or `--root` is not a directory.
    Environment,
    /// `git` (or another probe) could not be started.
    ProcessLaunch,
    /// A probe exited non-zero or outlived its timeout.
    ProcessExit,
    /// Bad input such as an invalid `DOCWARDEN_TODAY` date.
    Validation,
    /// Reading or rewriting a document or the config file failed.
    Io,
}

impl DocwardenErrorCategory {
    /// Process exit status reported for this category.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Environment => ENVIRONMENT_EXIT_CODE,
            _ => FAILURE_EXIT_CODE,
        }
    }
}

/// A failure printed as `error: ...` by the `docwarden` binary.
///
/// `operation` names the subcommand step (`init`, for example), `target` the document or config
/// file involved, and `hint` what the user can change to get past it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocwardenError {
    /// Kind of failure; decides the exit status.
    pub category: DocwardenErrorCategory,
    /// What went wrong.
    pub message: String,
    /// Subcommand step that failed.
    pub operation: Option<String>,
    /// Document, config file or directory involved.
    pub target: Option<String>,
    /// Suggested fix.
    pub hint: Option<String>,
}

/// Convenience result type for docwarden internals.
pub type DocwardenResult<T> = Result<T, DocwardenError>;

impl DocwardenError {
    /// Create an error with the given category and message.
    pub fn new(category: DocwardenErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            operation: None,
            target: None,
            hint: None,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::Config, message)
    }

    /// Create an environment error.
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::Environment, message)
    }

    /// Create a process launch error.
    pub fn process_launch(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::ProcessLaunch, message)
    }

    /// Create a process exit error.
    pub fn process_exit(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::ProcessExit, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::Validation, message)
    }

    /// Create an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(DocwardenErrorCategory::Io, message)
    }

    /// Attach an operation label.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach a target path.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.target = Some(path.display().to_string());
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for DocwardenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(operation) = &self.operation {
            write!(f, " [operation: {operation}]")?;
        }
        if let Some(target) = &self.target {
            write!(f, " [target: {target}]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " [hint: {hint}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for DocwardenError {}

impl From<std::io::Error> for DocwardenError {
    fn from(value: std::io::Error) -> Self {
        DocwardenError::io(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_context_in_stable_order() {
        let err = DocwardenError::validation("documentation directory not found")
            .with_operation("init")
            .with_path(Path::new("/work/docs"))
            .with_hint("create it with `mkdir -p docs`");
        assert_eq!(
            err.to_string(),
            "documentation directory not found [operation: init] [target: /work/docs] \
             [hint: create it with `mkdir -p docs`]"
        );
    }

    #[test]
    fn only_environment_errors_exit_with_two() {
        assert_eq!(
            DocwardenError::environment("could not find project root")
                .category
                .exit_code(),
            2
        );
        for err in [
            DocwardenError::config("bad pattern"),
            DocwardenError::validation("bad date"),
            DocwardenError::io("read-only docs"),
            DocwardenError::process_exit("git timed out"),
        ] {
            assert_eq!(err.category.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn io_errors_map_to_io_category() {
        let err: DocwardenError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.category, DocwardenErrorCategory::Io);
    }
}
