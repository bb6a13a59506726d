//! Command families behind the `docwarden` subcommands.

pub mod audit;
pub mod check;
pub mod init;

pub use audit::AuditCommand;
pub use check::CheckCommand;
pub use init::InitCommand;
