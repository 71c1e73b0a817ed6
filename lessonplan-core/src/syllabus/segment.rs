//! Block segmentation into events and a trailing details line

use std::sync::OnceLock;

use regex::Regex;

/// Details value used when a block has no trailing sections line
pub const DEFAULT_DETAILS: &str = "TBD";

fn details_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"TBD|—|-|,|\d{1,2}[A-Z]").expect("valid details regex"))
}

fn padded_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*,\s*").expect("valid comma regex"))
}

/// Events and details carved out of one week's block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub events: Vec<String>,
    pub details: String,
}

/// Whether `line` reads as a textbook-sections annotation.
///
/// Matches "TBD", an em-dash, a hyphen, a comma, or a section code such as
/// "3A". Event lines containing any of these are indistinguishable from a
/// real sections line and will be classified as details.
pub fn is_details_line(line: &str) -> bool {
    details_marker_re().is_match(line)
}

/// Rewrite whitespace-padded commas as ", " and trim.
pub fn canonicalize_details(line: &str) -> String {
    padded_comma_re().replace_all(line, ", ").trim().to_string()
}

/// Split a block into event lines and an optional trailing details line.
///
/// Only the last non-blank line is ever considered for details.
pub fn segment_block(block: &str) -> Block {
    let mut events: Vec<String> = block
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let details = match events.last() {
        Some(last) if is_details_line(last) => {
            let details = canonicalize_details(last);
            events.pop();
            details
        }
        _ => DEFAULT_DETAILS.to_string(),
    };

    Block { events, details }
}
