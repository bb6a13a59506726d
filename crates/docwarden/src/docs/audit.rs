//! Documentation health audit.

use crate::docs::history::{self, HistorySource};
use crate::docs::index::days_since;
use crate::docs::references::validate_references;
use crate::docs::scanner::{scan_docs, Document};
use crate::runtime::config::ResolvedConfig;
use crate::runtime::context::CommandContext;
use crate::runtime::error::DocwardenResult;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use docwarden_contract::{AuditResult, OrphanedRef, StaleDoc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

const MISSING_METADATA_PENALTY: i64 = 2;
const STALE_DOC_PENALTY: i64 = 3;
const ORPHANED_REF_PENALTY: i64 = 1;

/// Options for [`run_audit`].
#[derive(Clone, Copy, Debug)]
pub struct AuditOptions {
    /// Date references from git history instead of file mtimes.
    pub use_git: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self { use_git: true }
    }
}

/// Score a documentation tree out of 100.
///
/// Each document without metadata costs 2 points, each stale document 3 and each orphaned
/// reference 1. An empty tree scores 100.
pub fn compute_health_score(total: usize, without: usize, stale: usize, orphaned: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let penalty = |count: usize, weight: i64| {
        i64::try_from(count)
            .unwrap_or(i64::MAX)
            .saturating_mul(weight)
    };
    let score = 100_i64
        .saturating_sub(penalty(without, MISSING_METADATA_PENALTY))
        .saturating_sub(penalty(stale, STALE_DOC_PENALTY))
        .saturating_sub(penalty(orphaned, ORPHANED_REF_PENALTY));
    u8::try_from(score.clamp(0, 100)).unwrap_or(0)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Audit already-scanned documents.
pub fn audit_documents(
    root: &Path,
    docs: &[Document],
    config: &ResolvedConfig,
    history: &dyn HistorySource,
    today: NaiveDate,
) -> AuditResult {
    let docs_without_metadata: Vec<String> = docs
        .iter()
        .filter(|doc| !doc.has_our_metadata)
        .map(|doc| doc.rel_path.clone())
        .collect();

    let referenced: BTreeSet<&str> = docs
        .iter()
        .flat_map(|doc| doc.references())
        .map(String::as_str)
        .collect();
    let validation = validate_references(root, &referenced);
    let missing: BTreeSet<&str> = validation.missing.iter().map(String::as_str).collect();

    let mut seen = BTreeSet::new();
    let mut orphaned_refs = Vec::new();
    for doc in docs {
        for reference in doc.references() {
            if !missing.contains(reference.as_str()) {
                continue;
            }
            let orphan = OrphanedRef {
                doc_path: doc.rel_path.clone(),
                missing_ref: reference.clone(),
            };
            if seen.insert(orphan.clone()) {
                orphaned_refs.push(orphan);
            }
        }
    }

    let changed_at: BTreeMap<&str, DateTime<Utc>> = validation
        .existing
        .iter()
        .filter_map(|reference| {
            let changed = history.last_changed(reference)?;
            Some((reference.as_str(), changed))
        })
        .collect();

    let mut stale_docs = Vec::new();
    let mut archivable_docs = Vec::new();
    for doc in docs {
        let Some(metadata) = doc.metadata.as_ref() else {
            continue;
        };
        let age = days_since(metadata.last_verified, today);

        if age >= config.stale_threshold_days {
            let verified_at = start_of_day(metadata.last_verified);
            let changed_references = metadata
                .references
                .iter()
                .filter(|reference| {
                    changed_at
                        .get(reference.as_str())
                        .is_some_and(|changed| *changed > verified_at)
                })
                .cloned()
                .collect();
            stale_docs.push(StaleDoc {
                doc_path: doc.rel_path.clone(),
                last_verified: metadata.last_verified,
                days_since_verified: age,
                changed_references,
            });
        }

        if metadata.status.is_archivable() && age >= config.archive_threshold_days {
            archivable_docs.push(doc.rel_path.clone());
        }
    }

    let health_score = compute_health_score(
        docs.len(),
        docs_without_metadata.len(),
        stale_docs.len(),
        orphaned_refs.len(),
    );
    debug!(
        references = referenced.len(),
        dated = changed_at.len(),
        "audited references"
    );

    AuditResult {
        total_docs: docs.len(),
        docs_with_metadata: docs.len() - docs_without_metadata.len(),
        docs_without_metadata,
        stale_docs,
        orphaned_refs,
        archivable_docs,
        health_score,
    }
}

/// Scan the project's docs and audit them.
pub fn run_audit(ctx: &CommandContext, options: AuditOptions) -> DocwardenResult<AuditResult> {
    let docs = scan_docs(ctx.root(), ctx.config(), ctx.today())?;
    if docs.is_empty() {
        info!("no documents found");
        return Ok(AuditResult::empty());
    }
    let history = history::for_project(ctx.root(), *ctx.process(), options.use_git);
    let result = audit_documents(ctx.root(), &docs, ctx.config(), history.as_ref(), ctx.today());
    info!(
        total = result.total_docs,
        stale = result.stale_docs.len(),
        orphaned = result.orphaned_refs.len(),
        score = result.health_score,
        "audit complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::history::FilesystemHistory;
    use filetime::FileTime;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
    }

    fn doc(rel_path: &str, header: &str) -> Document {
        Document::from_raw(
            PathBuf::from(rel_path),
            rel_path.to_string(),
            format!("---\n{header}---\nbody\n"),
            None,
            date("2025-06-01"),
        )
    }

    struct FixedHistory(BTreeMap<String, DateTime<Utc>>);

    impl HistorySource for FixedHistory {
        fn last_changed(&self, rel_path: &str) -> Option<DateTime<Utc>> {
            self.0.get(rel_path).copied()
        }
    }

    #[test]
    fn health_score_formula() {
        assert_eq!(compute_health_score(0, 0, 0, 0), 100);
        assert_eq!(compute_health_score(10, 0, 0, 0), 100);
        assert_eq!(compute_health_score(10, 1, 1, 1), 94);
        assert_eq!(compute_health_score(10, 10, 10, 10), 40);
        assert_eq!(compute_health_score(100, 50, 50, 50), 0);
    }

    #[test]
    fn stale_docs_list_references_changed_after_verification() {
        let root = tempfile::tempdir().expect("temp root");
        fs::create_dir_all(root.path().join("src")).expect("src");
        fs::write(root.path().join("src/new.ts"), "").expect("new");
        fs::write(root.path().join("src/old.ts"), "").expect("old");

        let docs = vec![doc(
            "docs/PLAN.md",
            "status: active\nreferences:\n- src/new.ts\n- src/old.ts\nlast_verified: 2025-01-10\n",
        )];
        let history = FixedHistory(BTreeMap::from([
            ("src/new.ts".to_string(), Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 1).unwrap()),
            ("src/old.ts".to_string(), Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()),
        ]));

        let result = audit_documents(
            root.path(),
            &docs,
            &ResolvedConfig::default(),
            &history,
            date("2025-06-01"),
        );
        assert_eq!(result.stale_docs.len(), 1);
        assert_eq!(result.stale_docs[0].days_since_verified, 142);
        assert_eq!(result.stale_docs[0].changed_references, vec!["src/new.ts"]);
        assert!(result.orphaned_refs.is_empty());
    }

    #[test]
    fn stale_threshold_is_inclusive() {
        let root = tempfile::tempdir().expect("temp root");
        let docs = vec![
            doc("docs/at.md", "status: active\nlast_verified: 2025-05-02\n"),
            doc("docs/under.md", "status: active\nlast_verified: 2025-05-03\n"),
        ];
        let result = audit_documents(
            root.path(),
            &docs,
            &ResolvedConfig::default(),
            &FilesystemHistory::new(root.path()),
            date("2025-06-01"),
        );
        let stale: Vec<&str> = result.stale_docs.iter().map(|s| s.doc_path.as_str()).collect();
        assert_eq!(stale, vec!["docs/at.md"]);
    }

    #[test]
    fn orphans_are_reported_per_document() {
        let root = tempfile::tempdir().expect("temp root");
        let docs = vec![
            doc("docs/a.md", "references:\n- src/gone.ts\nlast_verified: 2025-06-01\n"),
            doc("docs/b.md", "references:\n- src/gone.ts\nlast_verified: 2025-06-01\n"),
        ];
        let result = audit_documents(
            root.path(),
            &docs,
            &ResolvedConfig::default(),
            &FilesystemHistory::new(root.path()),
            date("2025-06-01"),
        );
        assert_eq!(
            result.orphaned_refs,
            vec![
                OrphanedRef {
                    doc_path: "docs/a.md".into(),
                    missing_ref: "src/gone.ts".into()
                },
                OrphanedRef {
                    doc_path: "docs/b.md".into(),
                    missing_ref: "src/gone.ts".into()
                },
            ]
        );
        assert_eq!(result.health_score, 98);
    }

    #[test]
    fn only_old_completed_or_deprecated_docs_are_archivable() {
        let root = tempfile::tempdir().expect("temp root");
        let docs = vec![
            doc("docs/done.md", "status: completed\nlast_verified: 2025-01-01\n"),
            doc("docs/old.md", "status: deprecated\nlast_verified: 2025-03-03\n"),
            doc("docs/recent.md", "status: deprecated\nlast_verified: 2025-05-01\n"),
            doc("docs/active.md", "status: active\nlast_verified: 2024-01-01\n"),
            doc("docs/plain.md", ""),
        ];
        let result = audit_documents(
            root.path(),
            &docs,
            &ResolvedConfig::default(),
            &FilesystemHistory::new(root.path()),
            date("2025-06-01"),
        );
        assert_eq!(result.archivable_docs, vec!["docs/done.md", "docs/old.md"]);
        assert_eq!(result.total_docs, 5);
        assert_eq!(result.docs_with_metadata, 4);
        assert_eq!(result.docs_without_metadata, vec!["docs/plain.md"]);
    }

    #[test]
    fn filesystem_mtimes_feed_changed_references() {
        let root = tempfile::tempdir().expect("temp root");
        fs::create_dir_all(root.path().join("src")).expect("src");
        let file = root.path().join("src/auth.ts");
        fs::write(&file, "").expect("write");
        let changed = Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap();
        filetime::set_file_mtime(&file, FileTime::from_unix_time(changed.timestamp(), 0))
            .expect("set mtime");

        let docs = vec![doc(
            "docs/auth.md",
            "status: active\nreferences:\n- src/auth.ts\nlast_verified: 2020-01-01\n",
        )];
        let result = audit_documents(
            root.path(),
            &docs,
            &ResolvedConfig::default(),
            &FilesystemHistory::new(root.path()),
            date("2025-06-01"),
        );
        assert_eq!(result.stale_docs[0].changed_references, vec!["src/auth.ts"]);
    }
}
