//! Reference extraction and validation.
//!
//! Extraction recovers source paths a document mentions in prose. It runs as a fixed pipeline:
//! noise is stripped first (fenced code, URLs, tree diagrams, MDX import/export lines), then
//! prefix-anchored patterns collect candidates, which are resolved, filtered and deduplicated.
//! Every stage is a pure function over strings; only [`validate_references`] touches disk.

use crate::docs::paths::{
    normalize_lexical, normalize_ref, posix_extension, posix_file_name, posix_parent,
};
use crate::runtime::config::ResolvedConfig;
use crate::runtime::error::{DocwardenError, DocwardenResult};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

/// Path prefixes that anchor a reference when none are configured.
pub const DEFAULT_PATH_PREFIXES: &[&str] = &[
    "apps/", "libs/", "src/", "packages/", "cmd/", "internal/", "pkg/", "crates/", "lib/",
    "spec/", "config/", "app/", "routes/", "bin/", "scripts/", "tools/", ".github/", "deploy/",
    "infra/",
];

/// File extensions recognized as source references when none are configured.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts", ".rs", ".go", ".c", ".cpp",
    ".h", ".hpp", ".java", ".kt", ".kts", ".scala", ".gradle", ".vue", ".svelte", ".astro",
    ".css", ".scss", ".py", ".rb", ".php", ".swift", ".dart", ".ex", ".exs", ".hs", ".prisma",
    ".graphql", ".sql", ".proto", ".json", ".yaml", ".yml", ".toml", ".xml", ".tf", ".tfvars",
    ".sh", ".bash", ".md", ".mdx",
];

/// Extensionless file names accepted as references.
pub const NAMED_FILES: &[&str] = &["Dockerfile", "Makefile", "Justfile", "Procfile", "Gemfile"];

const TREE_DRAWING_CHARS: &[char] = &['├', '└', '│', '─', '┬', '┤', '┼', '┐', '┘', '┌'];

fn backtick_fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("valid fence regex"))
}

fn tilde_fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)~~~.*?~~~").expect("valid fence regex"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://[^\s)>]+").expect("valid url regex"))
}

/// Remove fenced code blocks delimited by triple backticks or triple tildes.
pub fn strip_fenced_code(text: &str) -> String {
    let text = backtick_fence_pattern().replace_all(text, "");
    tilde_fence_pattern().replace_all(&text, "").into_owned()
}

/// Remove `http://` and `https://` URLs.
pub fn strip_urls(text: &str) -> String {
    url_pattern().replace_all(text, "").into_owned()
}

/// Drop lines drawn with box characters, as in directory tree diagrams.
pub fn strip_tree_lines(text: &str) -> String {
    retain_lines(text, |line| !line.contains(TREE_DRAWING_CHARS))
}

/// Drop MDX/JSX `import` and `export` statements.
pub fn strip_import_export_lines(text: &str) -> String {
    retain_lines(text, |line| {
        let trimmed = line.trim();
        !["import", "export"].iter().any(|keyword| {
            trimmed
                .strip_prefix(keyword)
                .and_then(|rest| rest.chars().next())
                .is_some_and(char::is_whitespace)
        })
    })
}

fn retain_lines(text: &str, keep: impl Fn(&str) -> bool) -> String {
    text.split('\n')
        .filter(|line| keep(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compiled prefix patterns plus the recognized extension set.
///
/// Build one per invocation with [`ReferenceExtractor::from_config`] and reuse it for every
/// document.
#[derive(Clone, Debug)]
pub struct ReferenceExtractor {
    extensions: BTreeSet<String>,
    path_patterns: Vec<Regex>,
    named_patterns: Vec<Regex>,
}

impl ReferenceExtractor {
    /// Compile patterns for the given prefixes and extensions.
    ///
    /// Extensions are accepted with or without a leading dot. Empty lists fall back to the
    /// built-in defaults.
    pub fn new<P, E>(prefixes: &[P], extensions: &[E]) -> DocwardenResult<Self>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        let mut prefixes: Vec<&str> = prefixes.iter().map(|prefix| prefix.as_ref()).collect();
        if prefixes.is_empty() {
            prefixes = DEFAULT_PATH_PREFIXES.to_vec();
        }
        let mut extensions: BTreeSet<String> = extensions
            .iter()
            .map(|ext| {
                let ext = ext.as_ref().trim();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        if extensions.is_empty() {
            extensions = DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect();
        }

        let alternation = prefixes
            .iter()
            .map(|prefix| regex::escape(prefix))
            .collect::<Vec<_>>()
            .join("|");
        let path_patterns = [
            format!(r"`((?:{alternation})[^`\s]+)`"),
            format!(r"(?m)(?:^|\s)((?:{alternation})\S+\.\w+)"),
            format!(r"\[(?:[^\]]*)\]\(((?:{alternation})[^)\s]+)\)"),
        ]
        .iter()
        .map(|pattern| compile(pattern))
        .collect::<DocwardenResult<Vec<_>>>()?;
        let named_patterns = NAMED_FILES
            .iter()
            .map(|name| {
                compile(&format!(
                    r"(?m)(?:^|[`\s])({alternation})([\w/.-]*{})",
                    regex::escape(name)
                ))
            })
            .collect::<DocwardenResult<Vec<_>>>()?;

        Ok(Self {
            extensions,
            path_patterns,
            named_patterns,
        })
    }

    /// Extractor for the configured prefixes and extensions, or the defaults.
    pub fn from_config(config: &ResolvedConfig) -> DocwardenResult<Self> {
        Self::new(
            config.path_prefixes.as_deref().unwrap_or_default(),
            config.source_extensions.as_deref().unwrap_or_default(),
        )
    }

    /// Extractor using the built-in prefixes and extensions.
    pub fn with_defaults() -> DocwardenResult<Self> {
        Self::new(DEFAULT_PATH_PREFIXES, DEFAULT_SOURCE_EXTENSIONS)
    }

    /// Collect prefix-anchored candidates from already-stripped text.
    pub fn match_candidates(&self, text: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        for pattern in &self.path_patterns {
            candidates.extend(
                pattern
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
            );
        }
        for pattern in &self.named_patterns {
            candidates.extend(pattern.captures_iter(text).filter_map(|caps| {
                let prefix = caps.get(1)?.as_str();
                let rest = caps.get(2)?.as_str();
                Some(format!("{prefix}{rest}"))
            }));
        }
        candidates
    }

    /// Whether `path` names a recognized file: a named file or a known extension.
    pub fn has_recognized_file_name(&self, path: &str) -> bool {
        if NAMED_FILES.contains(&posix_file_name(path)) {
            return true;
        }
        posix_extension(path).is_some_and(|ext| self.extensions.contains(ext))
    }

    /// Run the full extraction pipeline over a document body.
    ///
    /// `doc_path` is the project-relative document path used to resolve `../` candidates.
    pub fn extract(&self, text: &str, doc_path: Option<&str>) -> BTreeSet<String> {
        let text = strip_fenced_code(text);
        let text = strip_urls(&text);
        let text = strip_tree_lines(&text);
        let text = strip_import_export_lines(&text);

        self.match_candidates(&text)
            .into_iter()
            .map(|candidate| resolve_relative(&normalize_ref(&candidate), doc_path))
            .filter(|candidate| !candidate.contains(['{', '}']))
            .filter(|candidate| self.has_recognized_file_name(candidate))
            .collect()
    }
}

fn compile(pattern: &str) -> DocwardenResult<Regex> {
    Regex::new(pattern).map_err(|err| {
        DocwardenError::validation(format!("invalid reference pattern: {err}"))
            .with_hint("check `pathPrefixes` in .docwarden.json")
    })
}

/// Resolve a `./` or `../` candidate against the directory of `doc_path`.
///
/// Other candidates, or any candidate without a document path, pass through unchanged.
pub fn resolve_relative(candidate: &str, doc_path: Option<&str>) -> String {
    match doc_path {
        Some(doc_path) if candidate.starts_with("./") || candidate.starts_with("../") => {
            let dir = posix_parent(doc_path);
            if dir.is_empty() {
                normalize_lexical(candidate)
            } else {
                normalize_lexical(&format!("{dir}/{candidate}"))
            }
        }
        _ => candidate.to_string(),
    }
}

/// Extract the references a document body claims to describe.
pub fn extract_references(
    text: &str,
    extractor: &ReferenceExtractor,
    doc_path: Option<&str>,
) -> BTreeSet<String> {
    extractor.extract(text, doc_path)
}

/// Partition of references by existence under the project root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceValidation {
    /// References that exist, in input order.
    pub existing: Vec<String>,
    /// References that do not exist, in input order.
    pub missing: Vec<String>,
}

/// Split `refs` into existing and missing paths relative to `root`.
pub fn validate_references<I, S>(root: &Path, refs: I) -> ReferenceValidation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut validation = ReferenceValidation::default();
    for reference in refs {
        let reference = reference.as_ref();
        if root.join(reference).exists() {
            validation.existing.push(reference.to_string());
        } else {
            validation.missing.push(reference.to_string());
        }
    }
    validation
}
