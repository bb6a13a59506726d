//! Project configuration loading and resolution.

use crate::runtime::error::{DocwardenError, DocwardenResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file name looked up at the project root.
pub const CONFIG_FILE_NAME: &str = ".docwarden.json";
/// Documentation directory used when none is configured.
pub const DEFAULT_DOCS_DIR: &str = "./docs";
/// Days after which a verified document counts as stale.
pub const DEFAULT_STALE_THRESHOLD_DAYS: i64 = 30;
/// Days after which a completed or deprecated document can be archived.
pub const DEFAULT_ARCHIVE_THRESHOLD_DAYS: i64 = 90;
/// Documents larger than this many bytes are skipped while scanning.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Generic JSON-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and JSON deserialization. Callers decide how
/// a missing or broken file degrades.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader for the given root-relative path.
    pub fn new(root: &Path, relative_path: &str) -> Self {
        Self {
            path: root.join(relative_path),
            _marker: PhantomData,
        }
    }

    /// Whether the config file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and deserialize the configuration file.
    ///
    /// Missing files, unreadable files, and JSON parse failures are all surfaced as
    /// [`DocwardenErrorCategory::Config`](crate::runtime::error::DocwardenErrorCategory::Config).
    pub fn load(&self) -> DocwardenResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            DocwardenError::config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        serde_json::from_str(&body).map_err(|err| {
            DocwardenError::config(format!("failed to parse {}: {err}", self.path.display()))
        })
    }

    /// Return the config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Config file contents as written by users; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    /// Documentation directory relative to the project root.
    #[serde(default)]
    pub docs_dir: Option<String>,
    /// Globs, relative to the docs directory, excluded from scanning.
    #[serde(default)]
    pub ignore: Option<Vec<String>>,
    /// Stale threshold in days.
    #[serde(default)]
    pub stale_threshold_days: Option<i64>,
    /// Archive threshold in days.
    #[serde(default)]
    pub archive_threshold_days: Option<i64>,
    /// Path prefixes that anchor reference extraction.
    #[serde(default)]
    pub path_prefixes: Option<Vec<String>>,
    /// File extensions that count as source references.
    #[serde(default)]
    pub source_extensions: Option<Vec<String>>,
    /// Frontmatter key that namespaces docwarden fields.
    #[serde(default)]
    pub frontmatter_key: Option<String>,
    /// Maximum document size in bytes.
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

/// Fully resolved configuration for one invocation.
///
/// `path_prefixes` and `source_extensions` stay `None` when the built-in lists apply so the
/// written config file does not freeze today's defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Documentation directory relative to the project root.
    pub docs_dir: String,
    /// Globs, relative to the docs directory, excluded from scanning.
    pub ignore: Vec<String>,
    /// Stale threshold in days.
    pub stale_threshold_days: i64,
    /// Archive threshold in days.
    pub archive_threshold_days: i64,
    /// Custom path prefixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefixes: Option<Vec<String>>,
    /// Custom source extensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_extensions: Option<Vec<String>>,
    /// Frontmatter namespace key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter_key: Option<String>,
    /// Maximum document size in bytes.
    pub max_file_size: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_config(PartialConfig::default())
    }
}

impl ResolvedConfig {
    /// Docs directory as a posix prefix without a leading `./` or trailing `/`.
    ///
    /// Returns an empty string when the docs directory is the project root.
    pub fn docs_prefix(&self) -> String {
        let trimmed = self.docs_dir.replace('\\', "/");
        let trimmed = trimmed.strip_prefix("./").unwrap_or(&trimmed);
        let trimmed = trimmed.trim_end_matches('/');
        if trimmed == "." {
            String::new()
        } else {
            trimmed.to_string()
        }
    }

    /// Absolute docs directory for the given project root.
    pub fn docs_root(&self, root: &Path) -> PathBuf {
        root.join(self.docs_prefix())
    }

    /// Namespace key, ignoring blank values.
    pub fn namespace(&self) -> Option<&str> {
        self.frontmatter_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Resolve a partial user config against the fixed defaults.
pub fn resolve_config(partial: PartialConfig) -> ResolvedConfig {
    ResolvedConfig {
        docs_dir: partial
            .docs_dir
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCS_DIR.to_string()),
        ignore: partial.ignore.unwrap_or_default(),
        stale_threshold_days: partial
            .stale_threshold_days
            .unwrap_or(DEFAULT_STALE_THRESHOLD_DAYS),
        archive_threshold_days: partial
            .archive_threshold_days
            .unwrap_or(DEFAULT_ARCHIVE_THRESHOLD_DAYS),
        path_prefixes: partial.path_prefixes.filter(|list| !list.is_empty()),
        source_extensions: partial.source_extensions.filter(|list| !list.is_empty()),
        frontmatter_key: partial.frontmatter_key,
        max_file_size: partial.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
    }
}

/// Load `.docwarden.json` from the project root.
///
/// A missing file resolves to defaults. An unreadable or unparseable file is discarded with a
/// warning and also resolves to defaults.
pub fn load_project_config(root: &Path) -> ResolvedConfig {
    let loader = ConfigLoader::<PartialConfig>::new(root, CONFIG_FILE_NAME);
    if !loader.exists() {
        debug!(path = %loader.path().display(), "no project config, using defaults");
        return ResolvedConfig::default();
    }
    match loader.load() {
        Ok(partial) => resolve_config(partial),
        Err(err) => {
            warn!(error = %err, "ignoring invalid project config, using defaults");
            ResolvedConfig::default()
        }
    }
}

/// Whether the project already has a config file.
pub fn project_config_exists(root: &Path) -> bool {
    ConfigLoader::<PartialConfig>::new(root, CONFIG_FILE_NAME).exists()
}

/// Write the resolved config to `.docwarden.json` at the project root.
pub fn write_project_config(root: &Path, config: &ResolvedConfig) -> DocwardenResult<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    let body = serde_json::to_string_pretty(config)
        .map_err(|err| DocwardenError::config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, format!("{body}\n")).map_err(|err| {
        DocwardenError::io(format!("failed to write {}: {err}", path.display())).with_path(&path)
    })?;
    Ok(path)
}
