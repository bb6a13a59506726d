//! Documentation tree discovery.

use crate::docs::frontmatter::{parse_frontmatter, MetadataBlock};
use crate::docs::paths::rel_posix;
use crate::runtime::config::ResolvedConfig;
use crate::runtime::error::DocwardenResult;
use chrono::NaiveDate;
use docwarden_contract::Metadata;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const DOC_EXTENSIONS: &[&str] = &["md", "mdx"];

/// One scanned documentation file.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Project-relative posix path, including the docs directory.
    pub rel_path: String,
    /// File contents as read.
    pub raw: String,
    /// Contents after the metadata block.
    pub body: String,
    /// Whether the block carries docwarden fields.
    pub has_our_metadata: bool,
    /// Whether there is any block, ours or foreign.
    pub has_metadata_block: bool,
    /// Docwarden metadata; present exactly when `has_our_metadata` is set.
    pub metadata: Option<Metadata>,
    /// File size in bytes.
    pub size: u64,
}

impl Document {
    /// Build a document record from file contents.
    pub fn from_raw(
        path: PathBuf,
        rel_path: String,
        raw: String,
        namespace: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        let parsed = parse_frontmatter(&raw, namespace, today);
        let has_metadata_block = parsed.has_metadata_block();
        let metadata = match parsed.block {
            MetadataBlock::Owned { metadata, .. } => Some(metadata),
            _ => None,
        };
        Self {
            path,
            rel_path,
            size: raw.len() as u64,
            raw,
            body: parsed.body,
            has_our_metadata: metadata.is_some(),
            has_metadata_block,
            metadata,
        }
    }

    /// References declared by docwarden metadata, if any.
    pub fn references(&self) -> impl Iterator<Item = &String> {
        self.metadata
            .iter()
            .flat_map(|metadata| metadata.references.iter())
    }
}

/// Compile the configured ignore globs.
///
/// Invalid patterns are dropped with a warning; the remaining globs still apply.
fn compile_ignore_globs(globs: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        match GlobBuilder::new(glob).literal_separator(true).build() {
            Ok(compiled) => {
                builder.add(compiled);
            }
            Err(err) => warn!(glob = %glob, error = %err, "ignoring invalid ignore glob"),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "ignore globs unusable, scanning without them");
        GlobSet::empty()
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_doc_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOC_EXTENSIONS.contains(&ext))
}

/// Scan every `*.md` and `*.mdx` file under the configured docs directory.
///
/// Dot-files, ignored paths, files over the size cap and non-UTF-8 files are skipped. A missing
/// docs directory yields no documents.
pub fn scan_docs(
    root: &Path,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> DocwardenResult<Vec<Document>> {
    let docs_root = config.docs_root(root);
    if !docs_root.is_dir() {
        debug!(docs_dir = %docs_root.display(), "docs directory missing");
        return Ok(Vec::new());
    }
    let ignore = compile_ignore_globs(&config.ignore);
    let docs_prefix = config.docs_prefix();
    let namespace = config.namespace();

    let mut docs = Vec::new();
    let walker = WalkDir::new(&docs_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable docs entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_doc_file(entry.path()) {
            continue;
        }
        let within_docs = rel_posix(&docs_root, entry.path());
        if ignore.is_match(&within_docs) {
            debug!(path = %within_docs, "ignored by config");
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                debug!(path = %within_docs, error = %err, "skipping doc without metadata");
                continue;
            }
        };
        if size > config.max_file_size {
            debug!(path = %within_docs, size, "skipping oversized doc");
            continue;
        }
        let raw = match fs::read(entry.path()).map(String::from_utf8) {
            Ok(Ok(raw)) => raw,
            Ok(Err(_)) => {
                debug!(path = %within_docs, "skipping non-UTF-8 doc");
                continue;
            }
            Err(err) => {
                debug!(path = %within_docs, error = %err, "skipping unreadable doc");
                continue;
            }
        };

        let rel_path = if docs_prefix.is_empty() {
            within_docs
        } else {
            format!("{docs_prefix}/{within_docs}")
        };
        docs.push(Document::from_raw(
            entry.path().to_path_buf(),
            rel_path,
            raw,
            namespace,
            today,
        ));
    }
    debug!(count = docs.len(), "scanned docs");
    Ok(docs)
}

/// Scan documents, keeping only those with docwarden metadata and at least one reference.
pub fn scan_docs_with_references(
    root: &Path,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> DocwardenResult<Vec<Document>> {
    Ok(scan_docs(root, config, today)?
        .into_iter()
        .filter(|doc| doc.references().next().is_some())
        .collect())
}
