//! Cross-referencing driver info logs against expanded source.
//!
//! Shader compilers report errors against line numbers in the submitted
//! text, but the log format is vendor-specific. An ordered list of patterns
//! is tried in sequence; the first one that yields a line number wins, and
//! new vendor formats extend the list without touching call sites. When a
//! line number is found, a short window of the expanded source around it is
//! formatted for the log output.

use crate::stage::StageKind;

lazy_static::lazy_static! {
    /// Tried in order. Index 0: Intel-style `0:12(7): error: ...`.
    /// Index 1: Nvidia `0(12) : error ...` and AMD `ERROR: 0:12: ...`.
    static ref LINE_NUMBER_PATTERNS: Vec<regex::Regex> = vec![
        regex::Regex::new(r"^\d+:(\d+)\(\d+\):").unwrap(),
        regex::Regex::new(r"[(:](\d+)[:)]").unwrap(),
    ];
}

/// Pull the offending source line number out of a vendor-formatted info log.
pub(crate) fn parse_offending_line(info_log: &str) -> Option<usize> {
    let info_log = info_log.trim();
    LINE_NUMBER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(info_log))
        .and_then(|captures| captures[1].parse().ok())
}

/// Format the lines surrounding `offending_line` (1-based) of `source`.
pub(crate) fn context_window(source: &str, offending_line: usize) -> String {
    let mut window = String::new();
    for (index, line) in source.lines().enumerate() {
        if index + 3 >= offending_line && index < offending_line + 2 {
            window.push_str(&format!("\t{:>5}\t{}\n", index + 1, line));
        }
    }
    window
}

/// Annotate an info log with source context when a line number can be parsed
/// out of it; otherwise fall back to the full expanded source.
pub(crate) fn annotate_info_log(stage: StageKind, info_log: &str, source: &str) -> String {
    match parse_offending_line(info_log) {
        Some(line) => format!(
            "{} shader, offending line {}:\n{}",
            stage,
            line,
            context_window(source, line)
        ),
        None => source.to_string(),
    }
}
