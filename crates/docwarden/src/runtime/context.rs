//! Shared command context passed into command families.

use crate::runtime::config::{load_project_config, ResolvedConfig};
use crate::runtime::error::{DocwardenError, DocwardenResult};
use crate::runtime::process::ProcessRunner;
use chrono::{Local, NaiveDate};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that pins "today" to a `YYYY-MM-DD` date.
pub const TODAY_OVERRIDE_ENV: &str = "DOCWARDEN_TODAY";

const PROJECT_ROOT_MARKERS: &[&str] = &[".git", "package.json", "Cargo.toml"];
const MISSING_ROOT_HINT: &str =
    "run inside a directory containing .git, package.json, or Cargo.toml, or pass --root";

/// Shared execution context for docwarden commands.
///
/// Holds the project root, the configuration resolved once for this invocation, the process
/// runner used for git probes, and the date every age computation is measured against.
#[derive(Clone, Debug)]
pub struct CommandContext {
    root: PathBuf,
    config: ResolvedConfig,
    process: ProcessRunner,
    today: NaiveDate,
}

impl CommandContext {
    /// Create a context from explicit parts.
    pub fn new(root: PathBuf, config: ResolvedConfig, today: NaiveDate) -> Self {
        Self {
            root,
            config,
            process: ProcessRunner::new(),
            today,
        }
    }

    /// Locate the project root and load its configuration.
    ///
    /// An explicit `root` is used as-is (joined onto the working directory when relative);
    /// otherwise the nearest ancestor of the working directory holding a project marker wins.
    pub fn discover(root: Option<&Path>) -> DocwardenResult<Self> {
        let root = match root {
            Some(root) if root.is_absolute() => root.to_path_buf(),
            Some(root) => env::current_dir()?.join(root),
            None => {
                let cwd = env::current_dir()?;
                find_project_root(&cwd).ok_or_else(|| {
                    DocwardenError::environment("could not find project root")
                        .with_path(&cwd)
                        .with_hint(MISSING_ROOT_HINT)
                })?
            }
        };
        if !root.is_dir() {
            return Err(DocwardenError::environment("project root is not a directory")
                .with_path(&root)
                .with_hint("pass an existing directory to --root"));
        }
        let config = load_project_config(&root);
        Ok(Self::new(root, config, current_date()?))
    }

    /// Replace the resolved configuration.
    pub fn with_config(mut self, config: ResolvedConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the process runner.
    pub fn with_process(mut self, process: ProcessRunner) -> Self {
        self.process = process;
        self
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Shared process runner.
    pub fn process(&self) -> &ProcessRunner {
        &self.process
    }

    /// Reference date for age computations.
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Walk up from `start` until a directory containing a project marker is found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            PROJECT_ROOT_MARKERS
                .iter()
                .any(|marker| dir.join(marker).exists())
        })
        .map(Path::to_path_buf)
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Today's local date, unless `DOCWARDEN_TODAY` pins it.
pub fn current_date() -> DocwardenResult<NaiveDate> {
    if let Ok(override_date) = env::var(TODAY_OVERRIDE_ENV) {
        return parse_iso_date(&override_date).ok_or_else(|| {
            DocwardenError::validation(format!(
                "invalid {TODAY_OVERRIDE_ENV} date `{override_date}` (expected YYYY-MM-DD)"
            ))
        });
    }
    Ok(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn find_project_root_walks_up_to_marker() {
        let root = tempfile::tempdir().expect("temp root");
        fs::create_dir(root.path().join(".git")).expect("git marker");
        let nested = root.path().join("docs/guides");
        fs::create_dir_all(&nested).expect("nested dir");

        assert_eq!(find_project_root(&nested), Some(root.path().to_path_buf()));
    }

    #[test]
    fn parse_iso_date_rejects_other_formats() {
        assert_eq!(
            parse_iso_date("2025-01-15"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(parse_iso_date("15/01/2025"), None);
        assert_eq!(parse_iso_date("2025-13-01"), None);
    }

    #[test]
    fn explicit_root_loads_project_config() {
        let root = tempfile::tempdir().expect("temp root");
        fs::write(
            root.path().join(".docwarden.json"),
            r#"{"staleThresholdDays": 5}"#,
        )
        .expect("write config");
        let ctx = CommandContext::discover(Some(root.path())).expect("context");
        assert_eq!(ctx.root(), root.path());
        assert_eq!(ctx.config().stale_threshold_days, 5);
    }

    #[test]
    fn context_parts_can_be_replaced() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("date");
        let mut config = ResolvedConfig::default();
        config.stale_threshold_days = 3;
        let ctx = CommandContext::new(PathBuf::from("/repo"), ResolvedConfig::default(), today)
            .with_config(config)
            .with_process(ProcessRunner::with_timeout(std::time::Duration::from_secs(1)));
        assert_eq!(ctx.config().stale_threshold_days, 3);
        assert_eq!(ctx.process().timeout().as_secs(), 1);
        assert_eq!(ctx.today(), today);
    }

    #[test]
    fn missing_root_is_an_environment_error() {
        let root = tempfile::tempdir().expect("temp root");
        let err = CommandContext::discover(Some(root.path().join("nope").as_path()))
            .expect_err("missing root should fail");
        assert_eq!(err.category, crate::runtime::error::DocwardenErrorCategory::Environment);
    }
}
