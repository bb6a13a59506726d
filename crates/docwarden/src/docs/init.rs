//! Metadata bootstrap: writes or refreshes docwarden fields in every scanned document.

use crate::docs::frontmatter::{generate_metadata, merge_frontmatter, render_document};
use crate::docs::references::{extract_references, validate_references, ReferenceExtractor};
use crate::docs::scanner::{scan_docs, Document};
use crate::runtime::config::{project_config_exists, write_project_config, ResolvedConfig};
use crate::runtime::context::CommandContext;
use crate::runtime::error::{DocwardenError, DocwardenResult};
use chrono::NaiveDate;
use docwarden_contract::InitSummary;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const ECOSYSTEM_MARKERS: &[(&str, &str, &[&str])] = &[
    ("go.mod", "go", &["cmd/", "internal/", "pkg/"]),
    ("Cargo.toml", "rust", &["crates/", "src/"]),
    ("pyproject.toml", "python", &["src/", "lib/", "tests/"]),
    ("Gemfile", "ruby", &["lib/", "spec/", "config/", "app/"]),
    ("composer.json", "php", &["app/", "routes/", "src/"]),
];

/// Options for [`run_init`].
#[derive(Clone, Debug, Default)]
pub struct InitOptions {
    /// Report what would change without writing anything.
    pub dry_run: bool,
    /// Skip writing metadata into documents.
    pub skip_frontmatter: bool,
    /// Docs directory overriding the configured one.
    pub docs_dir: Option<String>,
}

/// Path prefixes suggested by ecosystem marker files at the project root, in marker order.
pub fn detect_ecosystem_prefixes(root: &Path) -> Vec<String> {
    let mut prefixes: Vec<String> = Vec::new();
    for (marker, language, suggested) in ECOSYSTEM_MARKERS {
        if !root.join(marker).is_file() {
            continue;
        }
        debug!(language, marker, "detected ecosystem");
        for prefix in *suggested {
            if !prefixes.iter().any(|known| known == prefix) {
                prefixes.push(prefix.to_string());
            }
        }
    }
    prefixes
}

fn root_markdown_outside_docs(root: &Path, docs_prefix: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut outside: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".md") && !name.starts_with(docs_prefix))
        .collect();
    outside.sort();
    outside
}

/// Bootstrap docwarden metadata across the docs tree.
///
/// Documents without a block get generated metadata. Documents with a foreign block get
/// docwarden fields merged in. Documents that already carry metadata are refreshed, keeping
/// their references when they have any. The project config is written when missing.
pub fn run_init(ctx: &CommandContext, options: &InitOptions) -> DocwardenResult<InitSummary> {
    let root = ctx.root();
    let mut config = ctx.config().clone();
    if let Some(docs_dir) = &options.docs_dir {
        config.docs_dir = docs_dir.clone();
    }

    let mut summary = InitSummary {
        dry_run: options.dry_run,
        ..InitSummary::default()
    };
    let docs_root = config.docs_root(root);
    if !docs_root.is_dir() {
        warn!(
            docs_dir = %config.docs_dir,
            "documentation directory not found; create it with `mkdir -p {}`",
            config.docs_dir
        );
        return Ok(summary);
    }

    if config.path_prefixes.is_none() {
        let detected = detect_ecosystem_prefixes(root);
        if !detected.is_empty() {
            info!(prefixes = ?detected, "using ecosystem path prefixes");
            config.path_prefixes = Some(detected);
        }
    }

    summary.outside_docs = root_markdown_outside_docs(root, &config.docs_prefix());
    if !summary.outside_docs.is_empty() {
        info!(
            files = ?summary.outside_docs,
            "markdown files found outside {}",
            config.docs_dir
        );
    }

    let extractor = ReferenceExtractor::from_config(&config)?;
    let docs = scan_docs(root, &config, ctx.today())?;
    summary.docs_scanned = docs.len();

    if !options.skip_frontmatter {
        for doc in &docs {
            let updated = bootstrap_document(root, doc, &config, &extractor, ctx.today())?;
            if doc.has_our_metadata {
                summary.metadata_refreshed += 1;
            } else {
                summary.metadata_added += 1;
            }
            if updated == doc.raw {
                continue;
            }
            if options.dry_run {
                info!(doc = %doc.rel_path, "would update metadata");
                continue;
            }
            fs::write(&doc.path, updated).map_err(|err| {
                DocwardenError::io(format!("failed to write {}: {err}", doc.rel_path))
                    .with_operation("init")
                    .with_path(&doc.path)
            })?;
            debug!(doc = %doc.rel_path, "updated metadata");
        }
    }

    if !options.dry_run && !project_config_exists(root) {
        write_project_config(root, &config)?;
        summary.config_created = true;
    }

    info!(
        scanned = summary.docs_scanned,
        added = summary.metadata_added,
        refreshed = summary.metadata_refreshed,
        "init complete"
    );
    Ok(summary)
}

/// New contents for one document.
fn bootstrap_document(
    root: &Path,
    doc: &Document,
    config: &ResolvedConfig,
    extractor: &ReferenceExtractor,
    today: NaiveDate,
) -> DocwardenResult<String> {
    let extracted = extract_references(&doc.body, extractor, Some(&doc.rel_path));
    let existing = validate_references(root, &extracted).existing;
    let namespace = config.namespace();

    let rendered = match &doc.metadata {
        Some(metadata) => {
            let refs: Vec<String> = if metadata.references.is_empty() {
                existing
            } else {
                metadata.references.iter().cloned().collect()
            };
            merge_frontmatter(&doc.raw, &refs, namespace, today)
        }
        None if doc.has_metadata_block => merge_frontmatter(&doc.raw, &existing, namespace, today),
        None => {
            let metadata = generate_metadata(&doc.rel_path, &doc.body, existing, today);
            render_document(&metadata, namespace, &doc.body)
        }
    };
    rendered.map_err(|err| {
        DocwardenError::validation(format!("failed to render metadata for {}: {err}", doc.rel_path))
            .with_operation("init")
            .with_path(&doc.path)
    })
}
