//! Trace utilities

/// Trace category for command execution.
pub const COMMANDS: &str = "commands";
/// Trace category for word expansion.
pub const EXPANSION: &str = "expansion";
/// Trace category for user input.
pub const INPUT: &str = "input";
