//! Centralized limits and helper functions.

use std::path::Path;

/// Maximum length of an external tool diagnostic kept in logs and summaries
pub const MAX_DIAGNOSTIC_LENGTH: usize = 200;

/// Number of failed units listed individually in a batch summary
pub const MAX_FAILURES_LISTED: usize = 10;

/// Progress is logged every this many completed units
pub const PROGRESS_INTERVAL: usize = 50;

/// Truncate a tool diagnostic to [`MAX_DIAGNOSTIC_LENGTH`] characters,
/// trimming surrounding whitespace.
///
/// # Examples
///
/// ```
/// use orthotree::utils::validation::truncate_diagnostic;
///
/// assert_eq!(truncate_diagnostic("  exit 1\n"), "exit 1");
/// assert_eq!(truncate_diagnostic(&"x".repeat(500)).len(), 200);
/// ```
#[must_use]
pub fn truncate_diagnostic(message: &str) -> String {
    message.trim().chars().take(MAX_DIAGNOSTIC_LENGTH).collect()
}

/// True if `path` exists and holds at least one byte
#[must_use]
pub fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}
