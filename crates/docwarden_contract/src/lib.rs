//! Shared documentation-tracking contracts used by the docwarden engine and its report renderers.
//!
//! This crate is intentionally engine-agnostic. It defines the metadata a document carries about
//! itself plus the serializable results of the `check`, `audit`, and `init` workflows, without
//! depending on filesystem traversal, git, or terminal rendering.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Health scores strictly below this value mark an audit as failing.
pub const FAILING_HEALTH_THRESHOLD: u8 = 50;

/// Lifecycle status declared by a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocStatus {
    /// Document describes current behavior.
    #[default]
    Active,
    /// Work the document tracked is finished.
    Completed,
    /// Document is kept for history only.
    Deprecated,
}

impl DocStatus {
    /// Parses the wire spelling of a status.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }

    /// Returns the wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Deprecated => "deprecated",
        }
    }

    /// Whether documents with this status become archive candidates once old enough.
    pub fn is_archivable(self) -> bool {
        matches!(self, Self::Completed | Self::Deprecated)
    }
}

impl Display for DocStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse document category, inferred at generation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocCategory {
    /// A single unit of tracked work.
    Ticket,
    /// A plan for a feature.
    FeaturePlan,
    /// Architecture notes and decision records.
    Architecture,
    /// Strategy documents.
    Strategy,
    /// Agent or contributor skill descriptions.
    Skill,
    /// Anything else.
    #[default]
    General,
}

impl DocCategory {
    /// Parses the wire spelling of a category.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ticket" => Some(Self::Ticket),
            "feature-plan" => Some(Self::FeaturePlan),
            "architecture" => Some(Self::Architecture),
            "strategy" => Some(Self::Strategy),
            "skill" => Some(Self::Skill),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Returns the wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::FeaturePlan => "feature-plan",
            Self::Architecture => "architecture",
            Self::Strategy => "strategy",
            Self::Skill => "skill",
            Self::General => "general",
        }
    }
}

impl Display for DocCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured facts a document carries about itself.
///
/// `references` only ever holds project-relative paths; absolute paths and template paths are
/// filtered out before a value of this type is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Lifecycle status.
    #[serde(default)]
    pub status: DocStatus,
    /// Document category.
    #[serde(default)]
    pub category: DocCategory,
    /// Optional free-text feature grouping label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Source paths the document claims to describe.
    #[serde(default)]
    pub references: BTreeSet<String>,
    /// Date the document was last checked against its references.
    pub last_verified: NaiveDate,
}

impl Metadata {
    /// Creates active, general metadata verified on `last_verified` with no references.
    pub fn new(last_verified: NaiveDate) -> Self {
        Self {
            status: DocStatus::Active,
            category: DocCategory::General,
            feature: None,
            references: BTreeSet::new(),
            last_verified,
        }
    }
}

/// A document whose verification date is past the stale threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleDoc {
    /// Project-relative document path.
    pub doc_path: String,
    /// Declared verification date.
    pub last_verified: NaiveDate,
    /// Whole days elapsed since `last_verified`.
    pub days_since_verified: i64,
    /// References whose last change happened after `last_verified`.
    pub changed_references: Vec<String>,
}

/// A reference naming a file that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrphanedRef {
    /// Project-relative document path.
    pub doc_path: String,
    /// The referenced path that was not found.
    pub missing_ref: String,
}

/// Point-in-time documentation health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Number of scanned documents.
    pub total_docs: usize,
    /// Number of documents carrying docwarden metadata.
    pub docs_with_metadata: usize,
    /// Documents lacking docwarden metadata.
    pub docs_without_metadata: Vec<String>,
    /// Documents past the stale threshold.
    pub stale_docs: Vec<StaleDoc>,
    /// References that point at missing files.
    pub orphaned_refs: Vec<OrphanedRef>,
    /// Completed or deprecated documents past the archive threshold.
    pub archivable_docs: Vec<String>,
    /// Summary score in `0..=100`.
    pub health_score: u8,
}

impl AuditResult {
    /// Result for a project with no documents.
    pub fn empty() -> Self {
        Self {
            total_docs: 0,
            docs_with_metadata: 0,
            docs_without_metadata: Vec::new(),
            stale_docs: Vec::new(),
            orphaned_refs: Vec::new(),
            archivable_docs: Vec::new(),
            health_score: 100,
        }
    }

    /// Whether the score is low enough to fail a CI gate.
    pub fn is_failing(&self) -> bool {
        self.health_score < FAILING_HEALTH_THRESHOLD
    }
}

/// One document affected by a change to a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedDoc {
    /// Project-relative document path.
    pub doc_path: String,
    /// Declared verification date.
    pub last_verified: NaiveDate,
    /// Whole days elapsed since `last_verified`.
    pub days_since_verified: i64,
    /// Declared status.
    pub status: DocStatus,
}

/// Answer to "which docs reference this file".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Normalized project-relative source path that was checked.
    pub source_file: String,
    /// Documents referencing `source_file`.
    pub affected_docs: Vec<AffectedDoc>,
}

/// Outcome of an `init` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSummary {
    /// Number of scanned documents.
    pub docs_scanned: usize,
    /// Documents that received docwarden metadata for the first time.
    pub metadata_added: usize,
    /// Documents whose existing docwarden metadata was refreshed.
    pub metadata_refreshed: usize,
    /// Markdown files at the project root that live outside the docs directory.
    pub outside_docs: Vec<String>,
    /// Whether the project config file was written.
    pub config_created: bool,
    /// Whether the run only previewed changes.
    pub dry_run: bool,
}
