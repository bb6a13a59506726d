//! Markdown report rendering for CI summaries and pull request comments.

use docwarden_contract::AuditResult;
use tabled::builder::Builder;
use tabled::settings::Style;

fn markdown_table<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn code_list(items: &[String]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an audit result as a Markdown document.
pub fn render_audit(result: &AuditResult) -> String {
    let mut out = String::new();
    out.push_str("# Documentation Health Report\n\n");
    out.push_str(&format!("**Health Score:** {}/100\n\n", result.health_score));

    out.push_str("## Summary\n\n");
    out.push_str(&markdown_table(
        ["Metric", "Count"],
        vec![
            ["Total docs".into(), result.total_docs.to_string()],
            ["With metadata".into(), result.docs_with_metadata.to_string()],
            [
                "Without metadata".into(),
                result.docs_without_metadata.len().to_string(),
            ],
            ["Stale".into(), result.stale_docs.len().to_string()],
            ["Orphaned refs".into(), result.orphaned_refs.len().to_string()],
            ["Archivable".into(), result.archivable_docs.len().to_string()],
        ],
    ));
    out.push('\n');

    if !result.stale_docs.is_empty() {
        out.push_str("\n## Stale Documents\n\n");
        out.push_str(&markdown_table(
            ["Document", "Last Verified", "Days", "Changed References"],
            result
                .stale_docs
                .iter()
                .map(|doc| {
                    [
                        doc.doc_path.clone(),
                        doc.last_verified.to_string(),
                        doc.days_since_verified.to_string(),
                        code_list(&doc.changed_references),
                    ]
                })
                .collect(),
        ));
        out.push('\n');
    }

    if !result.orphaned_refs.is_empty() {
        out.push_str("\n## Orphaned References\n\n");
        out.push_str(&markdown_table(
            ["Document", "Missing Reference"],
            result
                .orphaned_refs
                .iter()
                .map(|orphan| [orphan.doc_path.clone(), format!("`{}`", orphan.missing_ref)])
                .collect(),
        ));
        out.push('\n');
    }

    if !result.docs_without_metadata.is_empty() {
        out.push_str("\n## Missing Metadata\n\n");
        for doc in &result.docs_without_metadata {
            out.push_str(&format!("- {doc}\n"));
        }
    }

    if !result.archivable_docs.is_empty() {
        out.push_str("\n## Archivable Documents\n\n");
        for doc in &result.archivable_docs {
            out.push_str(&format!("- {doc}\n"));
        }
    }
    out
}
