//! Documentation engine: extraction, metadata, scanning, indexing, auditing.

pub mod audit;
pub mod frontmatter;
pub mod history;
pub mod index;
pub mod init;
pub mod paths;
pub mod references;
pub mod scanner;
