//! Last-change dates for referenced files.
//!
//! Dates come from git when the project is a full clone and from filesystem modification times
//! otherwise. Each path is resolved on its own, and any git failure for one path falls back to
//! that path's mtime without affecting the others.

use crate::runtime::error::DocwardenError;
use crate::runtime::process::ProcessRunner;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Source of last-change timestamps for project-relative paths.
pub trait HistorySource {
    /// Last change of `rel_path`, or `None` when the path does not exist.
    fn last_changed(&self, rel_path: &str) -> Option<DateTime<Utc>>;
}

/// Why git could not date a path.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The git process failed to launch, exited non-zero, or timed out.
    #[error(transparent)]
    Process(#[from] DocwardenError),
    /// The path has no commits.
    #[error("no commits touch `{0}`")]
    Untracked(String),
    /// Git printed something other than a unix timestamp.
    #[error("unexpected git timestamp `{0}`")]
    InvalidTimestamp(String),
}

/// Filesystem modification times.
#[derive(Clone, Debug)]
pub struct FilesystemHistory {
    root: PathBuf,
}

impl FilesystemHistory {
    /// History rooted at the project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl HistorySource for FilesystemHistory {
    fn last_changed(&self, rel_path: &str) -> Option<DateTime<Utc>> {
        file_mtime(&self.root.join(rel_path))
    }
}

fn file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}

/// How much history the project's repository carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepositoryMode {
    /// Not a git repository, or git is unavailable.
    None,
    /// A shallow clone; commit dates are unreliable.
    Shallow,
    /// A repository with full history.
    Full,
}

/// Git commit dates, probed once per project.
#[derive(Clone, Debug)]
pub struct GitHistory {
    root: PathBuf,
    runner: ProcessRunner,
    mode: RepositoryMode,
}

impl GitHistory {
    /// Probe the repository at `root`.
    pub fn probe(root: impl Into<PathBuf>, runner: ProcessRunner) -> Self {
        let root = root.into();
        let mode = probe_mode(&root, &runner);
        debug!(root = %root.display(), ?mode, "probed repository");
        Self { root, runner, mode }
    }

    /// Repository mode found by the probe.
    pub fn mode(&self) -> RepositoryMode {
        self.mode
    }

    /// Commit time of the last change to `rel_path`.
    pub fn commit_time(&self, rel_path: &str) -> Result<DateTime<Utc>, HistoryError> {
        let out = self.runner.capture_stdout(
            &self.root,
            "git",
            &["log", "-1", "--format=%ct", "--", rel_path],
        )?;
        let stamp = out.trim();
        if stamp.is_empty() {
            return Err(HistoryError::Untracked(rel_path.to_string()));
        }
        stamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| HistoryError::InvalidTimestamp(stamp.to_string()))
    }
}

fn probe_mode(root: &Path, runner: &ProcessRunner) -> RepositoryMode {
    if let Err(err) = runner.capture_stdout(root, "git", &["rev-parse", "--git-dir"]) {
        debug!(error = %err, "not a git repository");
        return RepositoryMode::None;
    }
    match runner.capture_stdout(root, "git", &["rev-parse", "--is-shallow-repository"]) {
        Ok(out) if out.trim() == "true" => RepositoryMode::Shallow,
        _ => RepositoryMode::Full,
    }
}

impl HistorySource for GitHistory {
    fn last_changed(&self, rel_path: &str) -> Option<DateTime<Utc>> {
        let path = self.root.join(rel_path);
        if !path.exists() {
            return None;
        }
        if self.mode != RepositoryMode::Full {
            return file_mtime(&path);
        }
        match self.commit_time(rel_path) {
            Ok(changed) => Some(changed),
            Err(err) => {
                debug!(path = rel_path, error = %err, "falling back to mtime");
                file_mtime(&path)
            }
        }
    }
}

/// History source for a project: git when requested, filesystem otherwise.
pub fn for_project(root: &Path, runner: ProcessRunner, use_git: bool) -> Box<dyn HistorySource> {
    if use_git {
        Box::new(GitHistory::probe(root, runner))
    } else {
        Box::new(FilesystemHistory::new(root))
    }
}
