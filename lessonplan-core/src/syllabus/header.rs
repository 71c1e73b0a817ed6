//! Week header detection

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// The glyph a syllabus uses to mark "week N" (Korean 주)
pub const WEEK_MARKER: char = '주';

fn week_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(\d+)\s*{}\s+(\d{{1,2}}\.\d{{1,2}}-\d{{1,2}}\.\d{{1,2}})",
            WEEK_MARKER
        );
        Regex::new(&pattern).expect("valid week header regex")
    })
}

fn single_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d$").expect("valid digit regex"))
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    single_digit_re().is_match(c.encode_utf8(&mut buf))
}

/// Numeric value of a Unicode decimal digit (ASCII, full-width, etc.).
///
/// Decimal digits are assigned in contiguous runs of ten ordered 0..9, so
/// the value is the offset from the start of the run, modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// Fold a run of decimal digits into a week number.
///
/// Overflow saturates to `u32::MAX` so the header is kept.
fn week_number(digits: &str) -> u32 {
    let folded = digits.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    });

    folded.unwrap_or_else(|| {
        warn!(digits = %digits, "Week number does not fit in u32, using u32::MAX");
        u32::MAX
    })
}

/// A week header located in normalized syllabus text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekHeader {
    /// Week number (first digit group)
    pub week_no: u32,
    /// Date range token, e.g. "2.23-2.27"
    pub date_range: String,
    /// Byte offset where the header match starts
    pub start: usize,
    /// Byte offset where the header match ends
    pub end: usize,
}

/// Find every week header in `normalized`, left to right, without overlap.
///
/// Returns an empty list when the text has no headers.
pub fn locate_headers(normalized: &str) -> Vec<WeekHeader> {
    week_header_re()
        .captures_iter(normalized)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let week_no = caps.get(1)?.as_str();
            let date_range = caps.get(2)?.as_str();
            Some(WeekHeader {
                week_no: week_number(week_no),
                date_range: date_range.to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}
