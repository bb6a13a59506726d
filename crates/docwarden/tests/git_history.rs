mod support;

use chrono::{DateTime, Utc};
use docwarden::docs::audit::{run_audit, AuditOptions};
use docwarden::docs::history::{GitHistory, HistorySource, RepositoryMode};
use docwarden::runtime::process::ProcessRunner;
use std::path::Path;
use std::process::Command;
use support::{context, project, write};

fn git(root: &Path, args: &[&str], date: &str) {
    let status = Command::new("git")
        .current_dir(root)
        .args([
            "-c",
            "user.name=docwarden",
            "-c",
            "user.email=docwarden@example.invalid",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn commit(root: &Path, rel: &str, date: &str) {
    git(root, &["add", rel], date);
    git(root, &["commit", "-q", "-m", rel], date);
}

fn git_available() -> bool {
    ProcessRunner::new().command_available("git")
}

#[test]
fn git_history_dates_each_path_by_its_last_commit() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }
    let root = project();
    git(root.path(), &["init", "-q"], "2024-01-01T00:00:00Z");
    write(root.path(), "src/old.ts", "old\n");
    commit(root.path(), "src/old.ts", "2024-01-01T12:00:00Z");
    write(root.path(), "src/new.ts", "new\n");
    commit(root.path(), "src/new.ts", "2025-03-01T12:00:00Z");

    let history = GitHistory::probe(root.path(), ProcessRunner::new());
    assert_eq!(history.mode(), RepositoryMode::Full);
    assert_eq!(
        history.last_changed("src/old.ts"),
        DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z")
            .ok()
            .map(|date| date.with_timezone(&Utc))
    );
    assert_eq!(
        history.last_changed("src/new.ts"),
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .ok()
            .map(|date| date.with_timezone(&Utc))
    );
    assert_eq!(history.last_changed("src/absent.ts"), None);
}

#[test]
fn untracked_files_fall_back_to_mtime() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }
    let root = project();
    git(root.path(), &["init", "-q"], "2024-01-01T00:00:00Z");
    write(root.path(), "src/scratch.ts", "scratch\n");

    let history = GitHistory::probe(root.path(), ProcessRunner::new());
    assert!(history.last_changed("src/scratch.ts").is_some());
}

#[test]
fn audit_uses_commit_dates_for_changed_references() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }
    let root = project();
    git(root.path(), &["init", "-q"], "2024-01-01T00:00:00Z");
    write(root.path(), "src/old.ts", "old\n");
    commit(root.path(), "src/old.ts", "2024-01-01T12:00:00Z");
    write(root.path(), "src/new.ts", "new\n");
    commit(root.path(), "src/new.ts", "2025-03-01T12:00:00Z");
    write(
        root.path(),
        "docs/PLAN.md",
        "---\nstatus: active\nreferences:\n- src/new.ts\n- src/old.ts\nlast_verified: 2024-06-01\n---\n# Plan\n",
    );

    let result = run_audit(
        &context(root.path(), "2025-06-01"),
        AuditOptions { use_git: true },
    )
    .expect("audit");
    assert_eq!(result.stale_docs.len(), 1);
    assert_eq!(result.stale_docs[0].changed_references, vec!["src/new.ts".to_string()]);
}

#[test]
fn directories_outside_a_repository_have_no_git_mode() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }
    let root = project();
    let history = GitHistory::probe(root.path(), ProcessRunner::new());
    // A temp dir nested inside some other checkout would still resolve a git dir.
    if history.mode() == RepositoryMode::None {
        write(root.path(), "src/a.ts", "a\n");
        assert!(history.last_changed("src/a.ts").is_some());
    }
}
