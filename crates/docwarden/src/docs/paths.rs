//! Path string normalization shared by extraction, indexing and scanning.

use std::path::{Component, Path};

/// Canonicalize a reference string.
///
/// Converts backslashes to `/`, then strips one leading `./` and one leading `/`. Never touches
/// the filesystem.
pub fn normalize_ref(path: &str) -> String {
    let posix = path.replace('\\', "/");
    let posix = posix.strip_prefix("./").unwrap_or(&posix);
    let posix = posix.strip_prefix('/').unwrap_or(posix);
    posix.to_string()
}

/// Render `path` relative to `root` with posix separators.
///
/// Paths outside `root` are rendered as given.
pub fn rel_posix(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Collapse `.` and `..` segments of a posix path without consulting the filesystem.
///
/// Leading `..` segments that cannot be collapsed are kept.
pub fn normalize_lexical(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Parent directory of a posix path, or `""` for a bare file name.
pub fn posix_parent(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

/// Final segment of a posix path.
pub fn posix_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Final extension of a posix path including the dot, if any.
///
/// Dot-files such as `.env` have no extension.
pub fn posix_extension(path: &str) -> Option<&str> {
    let name = posix_file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx..]),
    }
}
