//! Error facilities

use std::path::PathBuf;

/// Monolithic error type for the shell.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error occurred while tokenizing a line.
    #[error(transparent)]
    Parse(#[from] rill_parser::ParseError),

    /// A `$(...)` construct was opened but never closed.
    #[error("unbalanced command substitution")]
    UnbalancedCommandSubstitution,

    /// An error occurred while sourcing the indicated script file.
    #[error("failed to source file {}: {}", .0.display(), .1)]
    FailedSourcingFile(PathBuf, #[source] std::io::Error),

    /// An I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// A platform call failed.
    #[error("system error: {0}")]
    SysError(#[from] nix::Error),
}
