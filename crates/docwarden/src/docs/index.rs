//! Reverse reference index: source path to the documents that reference it.

use crate::docs::paths::{normalize_ref, rel_posix};
use crate::docs::scanner::{scan_docs_with_references, Document};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DocwardenResult;
use chrono::NaiveDate;
use docwarden_contract::{AffectedDoc, CheckResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Normalized reference to the documents declaring it.
///
/// Borrowed from a scan and rebuilt for every query.
#[derive(Debug, Default)]
pub struct ReferenceIndex<'a> {
    entries: BTreeMap<String, Vec<&'a Document>>,
}

impl<'a> ReferenceIndex<'a> {
    /// Index every reference of every document carrying docwarden metadata.
    pub fn build(docs: &'a [Document]) -> Self {
        let mut entries: BTreeMap<String, Vec<&'a Document>> = BTreeMap::new();
        for doc in docs {
            for reference in doc.references() {
                let bucket = entries.entry(normalize_ref(reference)).or_default();
                if !bucket.iter().any(|known| known.rel_path == doc.rel_path) {
                    bucket.push(doc);
                }
            }
        }
        Self { entries }
    }

    /// Number of distinct references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no document declares any reference.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Documents referencing `path`.
    ///
    /// An exact key wins. Otherwise every bucket whose key is a suffix of `path`, or has `path`
    /// as a suffix, contributes, deduplicated by document path.
    pub fn lookup(&self, path: &str) -> Vec<&'a Document> {
        let path = normalize_ref(path);
        if let Some(exact) = self.entries.get(&path).filter(|docs| !docs.is_empty()) {
            return exact.clone();
        }

        let mut seen = BTreeSet::new();
        let mut matches = Vec::new();
        for (key, docs) in &self.entries {
            if !(path.ends_with(key.as_str()) || key.ends_with(path.as_str())) {
                continue;
            }
            for doc in docs {
                if seen.insert(doc.rel_path.as_str()) {
                    matches.push(*doc);
                }
            }
        }
        matches
    }
}

/// Whole days from `from` to `today`.
pub fn days_since(from: NaiveDate, today: NaiveDate) -> i64 {
    (today - from).num_days()
}

/// Affected-document records for a lookup result.
pub fn affected_docs(docs: &[&Document], today: NaiveDate) -> Vec<AffectedDoc> {
    docs.iter()
        .filter_map(|doc| {
            let metadata = doc.metadata.as_ref()?;
            Some(AffectedDoc {
                doc_path: doc.rel_path.clone(),
                last_verified: metadata.last_verified,
                days_since_verified: days_since(metadata.last_verified, today),
                status: metadata.status,
            })
        })
        .collect()
}

/// Project-relative, normalized form of a user-supplied file path.
pub fn resolve_source_path(root: &Path, file: &str) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        rel_posix(root, path)
    } else {
        normalize_ref(file)
    }
}

fn is_inside_docs(source: &str, docs_prefix: &str) -> bool {
    !docs_prefix.is_empty()
        && (source == docs_prefix
            || source
                .strip_prefix(docs_prefix)
                .is_some_and(|rest| rest.starts_with('/')))
}

/// Which documents reference `file`.
///
/// Files inside the docs directory are never checked and yield an empty result.
pub fn check_file(ctx: &CommandContext, file: &str) -> DocwardenResult<CheckResult> {
    let source_file = resolve_source_path(ctx.root(), file);
    let config = ctx.config();
    if is_inside_docs(&source_file, &config.docs_prefix()) {
        debug!(file = %source_file, "skipping documentation file");
        return Ok(CheckResult {
            source_file,
            affected_docs: Vec::new(),
        });
    }

    let docs = scan_docs_with_references(ctx.root(), config, ctx.today())?;
    let index = ReferenceIndex::build(&docs);
    let matches = index.lookup(&source_file);
    debug!(file = %source_file, matches = matches.len(), refs = index.len(), "checked file");
    Ok(CheckResult {
        affected_docs: affected_docs(&matches, ctx.today()),
        source_file,
    })
}
