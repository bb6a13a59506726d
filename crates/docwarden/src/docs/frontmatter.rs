//! YAML frontmatter parsing, generation and merging.
//!
//! A metadata block is a leading `---` line, YAML content, and a closing `---` line. Documents
//! may carry fields owned by other tools (static site generators, editors), so every write path
//! here preserves fields it does not own. With a namespace key configured, docwarden fields live
//! in a nested mapping under that key and only that mapping is inspected.

use crate::docs::paths::posix_file_name;
use crate::runtime::context::parse_iso_date;
use chrono::NaiveDate;
use docwarden_contract::{DocCategory, DocStatus, Metadata};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

const FRONTMATTER_DELIM: &str = "---";
const TOML_DELIM: &str = "+++";
const CATEGORY_SNIFF_CHARS: usize = 500;

const CATEGORY_KEYWORDS: &[(&str, DocCategory)] = &[
    ("T-", DocCategory::Ticket),
    ("ticket", DocCategory::Ticket),
    ("PLAN", DocCategory::FeaturePlan),
    ("plan", DocCategory::FeaturePlan),
    ("ARCHITECTURE", DocCategory::Architecture),
    ("architecture", DocCategory::Architecture),
    ("ADR", DocCategory::Architecture),
    ("GUIDELINES", DocCategory::Architecture),
    ("guidelines", DocCategory::Architecture),
    ("STRATEGY", DocCategory::Strategy),
    ("strategy", DocCategory::Strategy),
    ("SKILL", DocCategory::Skill),
    ("skill", DocCategory::Skill),
    ("README", DocCategory::General),
    ("CONTRIBUTING", DocCategory::General),
    ("CHANGELOG", DocCategory::General),
];

/// Why a metadata block could not be read.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The document opens with a TOML `+++` block.
    #[error("TOML frontmatter is not supported")]
    TomlBlock,
    /// The opening `---` line has no closing partner.
    #[error("frontmatter block is not terminated")]
    Unterminated,
    /// The block is not valid YAML.
    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The block is valid YAML but not a mapping.
    #[error("frontmatter is not a mapping")]
    NotAMapping,
}

/// What a document's metadata block holds.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataBlock {
    /// No readable block.
    Absent,
    /// A block without docwarden fields.
    Foreign(Mapping),
    /// A block carrying docwarden fields. `fields` is the full top-level mapping.
    Owned {
        /// Coerced docwarden metadata.
        metadata: Metadata,
        /// Every top-level field of the block.
        fields: Mapping,
    },
}

/// Parsed document: the classified block and the body after it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFrontmatter {
    /// Classified metadata block.
    pub block: MetadataBlock,
    /// Document text after the block.
    pub body: String,
}

impl ParsedFrontmatter {
    fn absent(body: &str) -> Self {
        Self {
            block: MetadataBlock::Absent,
            body: body.to_string(),
        }
    }

    /// Whether the document carries docwarden metadata.
    pub fn is_valid(&self) -> bool {
        matches!(self.block, MetadataBlock::Owned { .. })
    }

    /// Whether the document has any metadata block, ours or foreign.
    pub fn has_metadata_block(&self) -> bool {
        !matches!(self.block, MetadataBlock::Absent)
    }

    /// Docwarden metadata, if present.
    pub fn metadata(&self) -> Option<&Metadata> {
        match &self.block {
            MetadataBlock::Owned { metadata, .. } => Some(metadata),
            _ => None,
        }
    }
}

struct RawBlock<'a> {
    yaml: &'a str,
    body: &'a str,
}

fn split_block(raw: &str) -> Result<Option<RawBlock<'_>>, FrontmatterError> {
    if raw.starts_with(TOML_DELIM) {
        return Err(FrontmatterError::TomlBlock);
    }
    let Some(first_line_end) = raw.find('\n') else {
        return Ok(None);
    };
    if raw[..first_line_end].trim_end() != FRONTMATTER_DELIM {
        return Ok(None);
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    for line in raw[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_DELIM {
            return Ok(Some(RawBlock {
                yaml: &raw[yaml_start..offset],
                body: &raw[offset + line.len()..],
            }));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unterminated)
}

/// Read the top-level mapping of a document's block.
///
/// Returns `Ok(None)` with the body when the block is missing or empty.
fn read_fields(raw: &str) -> Result<(Option<Mapping>, &str), FrontmatterError> {
    let Some(block) = split_block(raw)? else {
        return Ok((None, raw));
    };
    if block.yaml.trim().is_empty() {
        return Ok((None, block.body));
    }
    match serde_yaml::from_str::<Value>(block.yaml)? {
        Value::Mapping(fields) => Ok((Some(fields), block.body)),
        Value::Null => Ok((None, block.body)),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Classify a document's metadata block.
///
/// Broken blocks are treated as absent: unparseable YAML keeps the raw text as the body, while a
/// block that parses to something other than a non-empty mapping yields the text after it.
pub fn parse_frontmatter(
    raw: &str,
    namespace: Option<&str>,
    today: NaiveDate,
) -> ParsedFrontmatter {
    let (fields, body) = match read_fields(raw) {
        Ok(read) => read,
        Err(FrontmatterError::NotAMapping) => {
            let body = split_block(raw).ok().flatten().map_or(raw, |block| block.body);
            return ParsedFrontmatter::absent(body);
        }
        Err(err) => {
            debug!(error = %err, "treating frontmatter as absent");
            return ParsedFrontmatter::absent(raw);
        }
    };
    let Some(fields) = fields.filter(|fields| !fields.is_empty()) else {
        return ParsedFrontmatter::absent(body);
    };

    let inspected = match namespace {
        Some(key) => match fields.get(key) {
            Some(Value::Mapping(nested)) => nested,
            _ => {
                return ParsedFrontmatter {
                    block: MetadataBlock::Foreign(fields),
                    body: body.to_string(),
                }
            }
        },
        None => &fields,
    };

    let block = if is_owned(inspected) {
        MetadataBlock::Owned {
            metadata: metadata_from_mapping(inspected, today),
            fields,
        }
    } else {
        MetadataBlock::Foreign(fields)
    };
    ParsedFrontmatter {
        block,
        body: body.to_string(),
    }
}

fn is_owned(mapping: &Mapping) -> bool {
    ["status", "references"]
        .iter()
        .any(|key| mapping.get(*key).is_some_and(|value| !value.is_null()))
}

fn metadata_from_mapping(mapping: &Mapping, today: NaiveDate) -> Metadata {
    let text = |key: &str| mapping.get(key).and_then(Value::as_str);
    Metadata {
        status: text("status").and_then(DocStatus::parse).unwrap_or_default(),
        category: text("category")
            .and_then(DocCategory::parse)
            .unwrap_or_default(),
        feature: text("feature")
            .filter(|feature| !feature.is_empty())
            .map(str::to_string),
        references: mapping
            .get("references")
            .and_then(Value::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        last_verified: text("last_verified")
            .and_then(parse_iso_date)
            .unwrap_or(today),
    }
}

/// Infer a category from the file name, directory, then the opening text.
pub fn infer_category(rel_path: &str, body: &str) -> DocCategory {
    let file_name = posix_file_name(rel_path);
    if let Some((_, category)) = CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| file_name.contains(keyword))
    {
        return *category;
    }

    if rel_path.to_lowercase().contains("/ticket") || ticket_dir_pattern().is_match(rel_path) {
        return DocCategory::Ticket;
    }

    let opening: String = body
        .chars()
        .take(CATEGORY_SNIFF_CHARS)
        .collect::<String>()
        .to_lowercase();
    if opening.contains("# ticket") {
        DocCategory::Ticket
    } else if opening.contains("## architecture") || opening.contains("# adr") {
        DocCategory::Architecture
    } else {
        DocCategory::General
    }
}

fn ticket_dir_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/T-\d+").expect("valid ticket regex"))
}

fn feature_dir_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"docs/feat[_-]([^/]+)/").expect("valid feature regex"))
}

/// Feature label from a `docs/feat-<name>/` or `docs/feat_<name>/` directory.
pub fn infer_feature(rel_path: &str) -> Option<String> {
    feature_dir_pattern()
        .captures(rel_path)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
}

/// Fresh metadata for a document that has none.
pub fn generate_metadata<I>(rel_path: &str, body: &str, references: I, today: NaiveDate) -> Metadata
where
    I: IntoIterator<Item = String>,
{
    Metadata {
        status: DocStatus::Active,
        category: infer_category(rel_path, body),
        feature: infer_feature(rel_path),
        references: references.into_iter().collect(),
        last_verified: today,
    }
}

/// Merge docwarden fields into a document's existing block.
///
/// Foreign fields keep their values and order. `status` and `category` keep existing values,
/// `last_verified` becomes `today`, and `references` is replaced only when `new_refs` is
/// non-empty. TOML and unreadable blocks come back unchanged.
pub fn merge_frontmatter(
    raw: &str,
    new_refs: &[String],
    namespace: Option<&str>,
    today: NaiveDate,
) -> Result<String, FrontmatterError> {
    let (fields, body) = match read_fields(raw) {
        Ok(read) => read,
        Err(err) => {
            debug!(error = %err, "leaving unreadable frontmatter untouched");
            return Ok(raw.to_string());
        }
    };
    let mut fields = fields.unwrap_or_default();

    match namespace {
        Some(key) => {
            let slot = fields
                .entry(Value::from(key))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !slot.is_mapping() {
                *slot = Value::Mapping(Mapping::new());
            }
            if let Some(nested) = slot.as_mapping_mut() {
                apply_owned_fields(nested, new_refs, today);
            }
        }
        None => apply_owned_fields(&mut fields, new_refs, today),
    }

    serialize_frontmatter(fields, body)
}

fn apply_owned_fields(target: &mut Mapping, new_refs: &[String], today: NaiveDate) {
    fill_missing(target, "status", DocStatus::default().as_str());
    fill_missing(target, "category", DocCategory::default().as_str());
    if !new_refs.is_empty() {
        target.insert(
            Value::from("references"),
            Value::Sequence(new_refs.iter().map(|r| Value::from(r.as_str())).collect()),
        );
    } else if target.get("references").map_or(true, Value::is_null) {
        target.insert(Value::from("references"), Value::Sequence(Vec::new()));
    }
    target.insert(
        Value::from("last_verified"),
        Value::from(today.format("%Y-%m-%d").to_string()),
    );
}

fn fill_missing(target: &mut Mapping, key: &str, default: &str) {
    if target.get(key).map_or(true, Value::is_null) {
        target.insert(Value::from(key), Value::from(default));
    }
}

/// Serialize fields and body back into a document.
///
/// Null values are dropped at every depth; remaining keys keep their order.
pub fn serialize_frontmatter(mut fields: Mapping, body: &str) -> Result<String, FrontmatterError> {
    strip_nulls(&mut fields);
    let yaml = serde_yaml::to_string(&fields)?;
    Ok(format!("{FRONTMATTER_DELIM}\n{yaml}{FRONTMATTER_DELIM}\n{body}"))
}

fn strip_nulls(mapping: &mut Mapping) {
    mapping.retain(|_, value| !value.is_null());
    for (_, value) in mapping.iter_mut() {
        match value {
            Value::Mapping(nested) => strip_nulls(nested),
            Value::Sequence(items) => items.retain(|item| !item.is_null()),
            _ => {}
        }
    }
}

/// Render generated metadata as a new block, nested under `namespace` when set.
pub fn render_document(
    metadata: &Metadata,
    namespace: Option<&str>,
    body: &str,
) -> Result<String, FrontmatterError> {
    let Value::Mapping(owned) = serde_yaml::to_value(metadata)? else {
        return Err(FrontmatterError::NotAMapping);
    };
    let fields = match namespace {
        Some(key) => {
            let mut outer = Mapping::new();
            outer.insert(Value::from(key), Value::Mapping(owned));
            outer
        }
        None => owned,
    };
    serialize_frontmatter(fields, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("date")
    }

    #[test]
    fn owned_block_is_parsed_and_coerced() {
        let raw = "---\nstatus: active\ncategory: ticket\nreferences:\n  - src/auth/auth.service.ts\n  - 42\nlast_verified: 2025-01-15\n---\n# Ticket\n";
        let parsed = parse_frontmatter(raw, None, today());
        assert!(parsed.is_valid());
        let metadata = parsed.metadata().expect("metadata");
        assert_eq!(metadata.category, DocCategory::Ticket);
        assert_eq!(
            metadata.references.iter().collect::<Vec<_>>(),
            vec!["src/auth/auth.service.ts"]
        );
        assert_eq!(metadata.last_verified, NaiveDate::from_ymd_opt(2025, 1, 15).expect("date"));
        assert_eq!(parsed.body, "# Ticket\n");
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let raw = "---\nstatus: archived\ncategory: misc\nreferences: src/a.ts\nlast_verified: yesterday\n---\nbody";
        let metadata = parse_frontmatter(raw, None, today())
            .metadata()
            .cloned()
            .expect("metadata");
        assert_eq!(metadata.status, DocStatus::Active);
        assert_eq!(metadata.category, DocCategory::General);
        assert!(metadata.references.is_empty());
        assert_eq!(metadata.last_verified, today());
    }

    #[test]
    fn foreign_block_is_recognized_but_not_owned() {
        let parsed = parse_frontmatter(
            "---\ntitle: My Doc\nlayout: default\n---\nbody",
            None,
            today(),
        );
        assert!(!parsed.is_valid());
        assert!(parsed.has_metadata_block());
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn toml_and_missing_blocks_are_absent() {
        let toml = "+++\ntitle = \"x\"\n+++\nbody";
        let parsed = parse_frontmatter(toml, None, today());
        assert_eq!(parsed.block, MetadataBlock::Absent);
        assert_eq!(parsed.body, toml);

        let plain = parse_frontmatter("# Just content", None, today());
        assert!(!plain.has_metadata_block());
    }

    #[test]
    fn horizontal_rules_are_not_a_block() {
        let parsed = parse_frontmatter("---\n\n# Content\n\n---\n\nMore content", None, today());
        assert!(!parsed.is_valid());
        assert!(!parsed.has_metadata_block());
        assert_eq!(parsed.body, "\nMore content");
    }

    #[test]
    fn invalid_yaml_keeps_raw_body() {
        let raw = "---\ntitle: [unclosed\n---\nbody";
        let parsed = parse_frontmatter(raw, None, today());
        assert_eq!(parsed.block, MetadataBlock::Absent);
        assert_eq!(parsed.body, raw);
    }

    #[test]
    fn namespaced_block_only_inspects_the_namespace() {
        let raw = "---\ntitle: Doc\ndocwarden:\n  status: active\n  references:\n    - src/foo.ts\n---\nbody";
        let parsed = parse_frontmatter(raw, Some("docwarden"), today());
        assert!(parsed.is_valid());
        assert!(parsed
            .metadata()
            .expect("metadata")
            .references
            .contains("src/foo.ts"));

        let unnamespaced =
            parse_frontmatter("---\nstatus: active\n---\nbody", Some("docwarden"), today());
        assert!(matches!(unnamespaced.block, MetadataBlock::Foreign(_)));
    }

    #[test]
    fn generate_infers_category_and_feature() {
        let metadata = generate_metadata(
            "docs/feat-auth/T-01.md",
            "# Ticket",
            vec!["src/auth/auth.service.ts".to_string()],
            today(),
        );
        assert_eq!(metadata.status, DocStatus::Active);
        assert_eq!(metadata.category, DocCategory::Ticket);
        assert_eq!(metadata.feature.as_deref(), Some("auth"));
        assert_eq!(metadata.last_verified, today());
    }

    #[test]
    fn category_inference_order() {
        assert_eq!(infer_category("docs/T-01.md", ""), DocCategory::Ticket);
        assert_eq!(infer_category("docs/feat-auth/PLAN.md", ""), DocCategory::FeaturePlan);
        assert_eq!(infer_category("docs/ARCHITECTURE.md", ""), DocCategory::Architecture);
        assert_eq!(infer_category("docs/Tickets/notes.md", ""), DocCategory::Ticket);
        assert_eq!(infer_category("docs/T-12/notes.md", ""), DocCategory::Ticket);
        assert_eq!(infer_category("docs/notes.md", "# ADR 4: Storage"), DocCategory::Architecture);
        assert_eq!(infer_category("docs/random.md", ""), DocCategory::General);
    }

    #[test]
    fn feature_requires_a_feature_directory() {
        assert_eq!(
            infer_feature("docs/feat-user-retention/PLAN.md").as_deref(),
            Some("user-retention")
        );
        assert_eq!(infer_feature("docs/feat_billing/x.md").as_deref(), Some("billing"));
        assert_eq!(infer_feature("docs/README.md"), None);
    }

    #[test]
    fn merge_preserves_foreign_fields_and_order() {
        let raw = "---\ntitle: My Doc\nlayout: default\n---\n# Body\n";
        let merged = merge_frontmatter(raw, &["src/foo.ts".to_string()], None, today())
            .expect("merge");
        assert!(merged.ends_with("---\n# Body\n"));

        let (fields, body) = read_fields(&merged).expect("fields");
        let fields = fields.expect("mapping");
        let keys: Vec<&str> = fields.keys().filter_map(Value::as_str).collect();
        assert_eq!(
            keys,
            vec!["title", "layout", "status", "category", "references", "last_verified"]
        );
        assert_eq!(fields.get("title").and_then(Value::as_str), Some("My Doc"));
        assert_eq!(fields.get("status").and_then(Value::as_str), Some("active"));
        assert_eq!(
            fields.get("last_verified").and_then(Value::as_str),
            Some("2025-06-01")
        );
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn merge_keeps_existing_references_when_none_are_new() {
        let raw = "---\nstatus: completed\nreferences:\n- src/old.ts\nlast_verified: 2020-01-01\n---\nbody";
        let merged = merge_frontmatter(raw, &[], None, today()).expect("merge");
        let parsed = parse_frontmatter(&merged, None, today());
        let metadata = parsed.metadata().expect("metadata");
        assert_eq!(metadata.status, DocStatus::Completed);
        assert!(metadata.references.contains("src/old.ts"));
        assert_eq!(metadata.last_verified, today());
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn merge_with_new_references_replaces_the_old_list() {
        let raw = "---\nstatus: active\nreferences:\n- src/old.ts\nlast_verified: 2020-01-01\n---\nbody";
        let merged =
            merge_frontmatter(raw, &["src/new.ts".to_string()], None, today()).expect("merge");
        let parsed = parse_frontmatter(&merged, None, today());
        let metadata = parsed.metadata().expect("metadata");
        assert_eq!(
            metadata.references.iter().collect::<Vec<_>>(),
            vec!["src/new.ts"]
        );
    }

    #[test]
    fn merge_into_namespace_keeps_foreign_nested_fields() {
        let raw = "---\ntitle: Doc\ndocwarden:\n  owner: docs-team\n---\nbody";
        let merged = merge_frontmatter(raw, &[], Some("docwarden"), today()).expect("merge");
        let (fields, _) = read_fields(&merged).expect("fields");
        let fields = fields.expect("mapping");
        assert_eq!(fields.get("title").and_then(Value::as_str), Some("Doc"));
        let nested = fields
            .get("docwarden")
            .and_then(Value::as_mapping)
            .expect("namespace");
        assert_eq!(nested.get("owner").and_then(Value::as_str), Some("docs-team"));
        assert_eq!(nested.get("references").and_then(Value::as_sequence).map(Vec::len), Some(0));
    }

    #[test]
    fn merge_leaves_unreadable_documents_untouched() {
        let toml = "+++\ntitle = \"x\"\n+++\nbody";
        assert_eq!(merge_frontmatter(toml, &[], None, today()).expect("merge"), toml);
        let broken = "---\ntitle: [unclosed\n---\nbody";
        assert_eq!(merge_frontmatter(broken, &[], None, today()).expect("merge"), broken);
    }

    #[test]
    fn merge_is_stable_on_its_own_output() {
        let raw = "---\ntitle: Doc\n---\nbody\n";
        let refs = vec!["src/a.ts".to_string()];
        let once = merge_frontmatter(raw, &refs, None, today()).expect("first merge");
        let twice = merge_frontmatter(&once, &refs, None, today()).expect("second merge");
        assert_eq!(once, twice);
    }

    #[test]
    fn serialize_drops_null_fields() {
        let mut fields = Mapping::new();
        fields.insert(Value::from("status"), Value::from("active"));
        fields.insert(Value::from("feature"), Value::Null);
        let out = serialize_frontmatter(fields, "body").expect("serialize");
        assert_eq!(out, "---\nstatus: active\n---\nbody");
    }

    #[test]
    fn rendered_document_parses_back_to_the_same_metadata() {
        let metadata = generate_metadata(
            "docs/PLAN.md",
            "# Plan",
            vec!["src/a.ts".to_string()],
            today(),
        );
        let rendered = render_document(&metadata, Some("docwarden"), "# Plan\n").expect("render");
        let parsed = parse_frontmatter(&rendered, Some("docwarden"), today());
        assert_eq!(parsed.metadata(), Some(&metadata));
        assert_eq!(parsed.body, "# Plan\n");
    }
}
