//! Colored terminal rendering.

use docwarden_contract::{AuditResult, CheckResult, InitSummary};
use nu_ansi_term::{Color, Style};

const FRESH_DAYS: i64 = 14;
const AGING_DAYS: i64 = 30;
const HEALTHY_SCORE: u8 = 80;

/// Styles text when colors are enabled and passes it through otherwise.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Palette that emits ANSI escapes only when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, style: Style, text: impl AsRef<str>) -> String {
        if self.enabled {
            style.paint(text.as_ref()).to_string()
        } else {
            text.as_ref().to_string()
        }
    }

    fn color(&self, color: Color, text: impl AsRef<str>) -> String {
        self.paint(color.normal(), text)
    }

    fn bold(&self, text: impl AsRef<str>) -> String {
        self.paint(Style::new().bold(), text)
    }

    fn dim(&self, text: impl AsRef<str>) -> String {
        self.paint(Style::new().dimmed(), text)
    }
}

fn age_color(days: i64) -> Color {
    if days > AGING_DAYS {
        Color::Red
    } else if days > FRESH_DAYS {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Render the documents affected by a source change.
///
/// Returns an empty string when nothing references the file.
pub fn render_check(result: &CheckResult, palette: Palette) -> String {
    if result.affected_docs.is_empty() {
        return String::new();
    }
    let mut lines = vec![palette.color(
        Color::Yellow,
        format!(
            "docwarden: {} doc(s) reference {}",
            result.affected_docs.len(),
            result.source_file
        ),
    )];
    for doc in &result.affected_docs {
        let age = palette.color(
            age_color(doc.days_since_verified),
            format!("{}d ago", doc.days_since_verified),
        );
        lines.push(format!(
            "  {} ({}, verified {age})",
            palette.color(Color::Cyan, &doc.doc_path),
            doc.status
        ));
    }
    lines.join("\n")
}

/// Render an audit result.
pub fn render_audit(result: &AuditResult, palette: Palette) -> String {
    let score_color = if result.health_score >= HEALTHY_SCORE {
        Color::Green
    } else if result.is_failing() {
        Color::Red
    } else {
        Color::Yellow
    };

    let mut lines = vec![
        String::new(),
        palette.bold(format!(
            "Documentation Health Score: {}/100",
            palette.color(score_color, result.health_score.to_string())
        )),
        String::new(),
        palette.bold("Summary"),
        format!("  Total docs: {}", result.total_docs),
        format!("  With metadata: {}", result.docs_with_metadata),
        format!("  Without metadata: {}", result.docs_without_metadata.len()),
        format!("  Stale: {}", result.stale_docs.len()),
        format!("  Orphaned refs: {}", result.orphaned_refs.len()),
        format!("  Archivable: {}", result.archivable_docs.len()),
    ];

    if !result.stale_docs.is_empty() {
        lines.push(String::new());
        lines.push(palette.paint(Color::Yellow.bold(), "Stale Documents"));
        for doc in &result.stale_docs {
            lines.push(format!(
                "  {} (verified {})",
                palette.color(Color::Cyan, &doc.doc_path),
                palette.color(Color::Red, format!("{}d ago", doc.days_since_verified))
            ));
            if !doc.changed_references.is_empty() {
                let changed: Vec<String> = doc
                    .changed_references
                    .iter()
                    .map(|reference| palette.dim(reference))
                    .collect();
                lines.push(format!("    Changed: {}", changed.join(", ")));
            }
        }
    }

    if !result.orphaned_refs.is_empty() {
        lines.push(String::new());
        lines.push(palette.paint(Color::Red.bold(), "Orphaned References"));
        for orphan in &result.orphaned_refs {
            lines.push(format!(
                "  {} -> {}",
                palette.color(Color::Cyan, &orphan.doc_path),
                palette.color(Color::Red, &orphan.missing_ref)
            ));
        }
    }

    for (title, docs) in [
        ("Missing Metadata", &result.docs_without_metadata),
        ("Archivable Documents", &result.archivable_docs),
    ] {
        if docs.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(palette.paint(Style::new().bold().dimmed(), title));
        lines.extend(docs.iter().map(|doc| format!("  {}", palette.dim(doc))));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Render an init summary.
pub fn render_init(summary: &InitSummary, palette: Palette) -> String {
    let mut lines = vec![
        palette.bold("docwarden init"),
        format!(
            "  Docs scanned: {}",
            palette.color(Color::Cyan, summary.docs_scanned.to_string())
        ),
        format!(
            "  Metadata added: {}",
            palette.color(Color::Green, summary.metadata_added.to_string())
        ),
        format!(
            "  Metadata refreshed: {}",
            palette.dim(summary.metadata_refreshed.to_string())
        ),
    ];
    if !summary.outside_docs.is_empty() {
        lines.push(palette.color(
            Color::Yellow,
            format!(
                "  Markdown outside the docs directory: {}",
                summary.outside_docs.join(", ")
            ),
        ));
    }
    if summary.config_created {
        lines.push(format!(
            "  Config created: {}",
            palette.color(Color::Green, crate::runtime::config::CONFIG_FILE_NAME)
        ));
    }
    if summary.dry_run {
        lines.push(palette.color(Color::Yellow, "  (dry run, no files modified)"));
    }
    lines.join("\n")
}
