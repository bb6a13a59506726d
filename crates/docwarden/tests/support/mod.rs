#![allow(dead_code)]

use chrono::NaiveDate;
use docwarden::runtime::config::ResolvedConfig;
use docwarden::runtime::context::CommandContext;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
}

pub fn project() -> TempDir {
    let root = tempfile::tempdir().expect("temp project");
    fs::create_dir_all(root.path().join("docs")).expect("docs dir");
    root
}

pub fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir");
    }
    fs::write(path, body).expect("write file");
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).expect("read file")
}

pub fn context(root: &Path, today: &str) -> CommandContext {
    CommandContext::new(root.to_path_buf(), ResolvedConfig::default(), date(today))
}
