//! JSON report rendering.

use crate::runtime::error::{DocwardenError, DocwardenResult};
use docwarden_contract::{AuditResult, CheckResult};
use serde::Serialize;

fn to_pretty_json<T: Serialize>(value: &T) -> DocwardenResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| DocwardenError::validation(format!("failed to serialize report: {err}")))
}

/// Render an audit result.
pub fn render_audit(result: &AuditResult) -> DocwardenResult<String> {
    to_pretty_json(result)
}

/// Render a check result.
pub fn render_check(result: &CheckResult) -> DocwardenResult<String> {
    to_pretty_json(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docwarden_contract::{AffectedDoc, DocStatus, StaleDoc};
    use pretty_assertions::assert_eq;

    #[test]
    fn audit_json_parses_back_to_the_same_result() {
        let mut result = AuditResult::empty();
        result.total_docs = 2;
        result.docs_with_metadata = 1;
        result.docs_without_metadata = vec!["docs/plain.md".into()];
        result.stale_docs = vec![StaleDoc {
            doc_path: "docs/PLAN.md".into(),
            last_verified: NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"),
            days_since_verified: 2000,
            changed_references: vec!["src/a.ts".into()],
        }];
        result.health_score = 95;

        let text = render_audit(&result).expect("render");
        let back: AuditResult = serde_json::from_str(&text).expect("parse");
        assert_eq!(back, result);
    }

    #[test]
    fn check_json_uses_snake_case_fields() {
        let result = CheckResult {
            source_file: "src/a.ts".into(),
            affected_docs: vec![AffectedDoc {
                doc_path: "docs/a.md".into(),
                last_verified: NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
                days_since_verified: 3,
                status: DocStatus::Completed,
            }],
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_check(&result).expect("render")).expect("parse");
        assert_eq!(value["source_file"], "src/a.ts");
        assert_eq!(value["affected_docs"][0]["status"], "completed");
        assert_eq!(value["affected_docs"][0]["last_verified"], "2025-01-01");
    }
}
