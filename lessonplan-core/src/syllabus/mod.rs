//! Syllabus parsing
//!
//! This module turns text extracted from a syllabus document into an
//! ordered list of [`WeekRecord`]s. Parsing runs in three steps:
//! whitespace normalization, week header detection, and segmentation of
//! the text between consecutive headers into events and a details line.

mod header;
mod normalize;
mod segment;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

pub use header::{locate_headers, WeekHeader, WEEK_MARKER};
pub use normalize::normalize;
pub use segment::{canonicalize_details, is_details_line, segment_block, Block, DEFAULT_DETAILS};

/// One week of a syllabus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRecord {
    /// Week number as written in the header
    pub week_no: u32,
    /// Date range token, e.g. "2.23-2.27"
    pub date_range: String,
    /// Event lines in document order
    pub events: Vec<String>,
    /// Textbook sections annotation, or "TBD"
    pub details: String,
}

impl WeekRecord {
    /// Display label, e.g. "Week 3 (4.1-4.5)"
    pub fn label(&self) -> String {
        format!("Week {} ({})", self.week_no, self.date_range)
    }
}

/// Parse raw syllabus text into week records.
///
/// Text before the first header is discarded. Each record's block runs from
/// the end of its header to the start of the next header, or to the end of
/// the document for the last one. Returns an empty list when no headers are
/// found; callers decide whether that is an error (see [`require_weeks`]).
pub fn parse(text: &str) -> Vec<WeekRecord> {
    let normalized = normalize(text);
    let headers = locate_headers(&normalized);
    debug!(headers = headers.len(), chars = normalized.len(), "Located week headers");

    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let end = headers
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(normalized.len());
            let Block { events, details } = segment_block(&normalized[header.end..end]);

            WeekRecord {
                week_no: header.week_no,
                date_range: header.date_range.clone(),
                events,
                details,
            }
        })
        .collect()
}

/// Treat an empty parse result as a user-facing error.
pub fn require_weeks(records: Vec<WeekRecord>) -> Result<Vec<WeekRecord>> {
    if records.is_empty() {
        return Err(Error::NoWeeksFound);
    }
    Ok(records)
}

/// Keep only the records for `week_no`, preserving document order.
///
/// A syllabus that repeats a header yields more than one record.
pub fn select_week(records: &[WeekRecord], week_no: u32) -> Result<Vec<WeekRecord>> {
    let selected: Vec<WeekRecord> = records
        .iter()
        .filter(|record| record.week_no == week_no)
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(Error::WeekNotFound(week_no));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SYLLABUS: &str = "2026 Grade 6 Life Science Syllabus
Teacher: Kim

1주 2.23-2.27
Orientation
Intro to cells
1A, 1B



2 주   3.2-3.6
Lab safety
\tMicroscope practice
2A ,2B

3주 3.9-3.13
Field trip

4주 3.16-3.20
";

    #[test]
    fn test_parse_week_count_and_order() {
        let weeks = parse(SAMPLE_SYLLABUS);
        let numbers: Vec<u32> = weeks.iter().map(|w| w.week_no).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(weeks[0].date_range, "2.23-2.27");
        assert_eq!(weeks[1].date_range, "3.2-3.6");
    }

    #[test]
    fn test_parse_events_and_details() {
        let weeks = parse(SAMPLE_SYLLABUS);
        assert_eq!(weeks[0].events, vec!["Orientation", "Intro to cells"]);
        assert_eq!(weeks[0].details, "1A, 1B");
        assert_eq!(weeks[1].events, vec!["Lab safety", "Microscope practice"]);
        assert_eq!(weeks[1].details, "2A, 2B");
    }

    #[test]
    fn test_parse_week_without_details() {
        let weeks = parse(SAMPLE_SYLLABUS);
        assert_eq!(weeks[2].events, vec!["Field trip"]);
        assert_eq!(weeks[2].details, "TBD");
    }

    #[test]
    fn test_parse_trailing_empty_week() {
        let weeks = parse(SAMPLE_SYLLABUS);
        assert!(weeks[3].events.is_empty());
        assert_eq!(weeks[3].details, "TBD");
    }

    #[test]
    fn test_parse_discards_preamble() {
        let weeks = parse(SAMPLE_SYLLABUS);
        assert!(weeks
            .iter()
            .flat_map(|w| w.events.iter())
            .all(|e| !e.contains("Syllabus") && !e.contains("Teacher")));
    }

    #[test]
    fn test_parse_header_scenario() {
        let weeks = parse("3주 4.1-4.5");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week_no, 3);
        assert_eq!(weeks[0].date_range, "4.1-4.5");
        assert!(weeks[0].events.is_empty());
        assert_eq!(weeks[0].details, "TBD");
    }

    #[test]
    fn test_parse_headers_on_one_line() {
        // PDF extraction sometimes puts several rows on one line
        let weeks = parse("1주 2.23-2.27 Orientation 2주 3.2-3.6 Quiz");
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].events, vec!["Orientation"]);
        assert_eq!(weeks[1].events, vec!["Quiz"]);
    }

    #[test]
    fn test_parse_duplicate_headers_kept() {
        let weeks = parse("5주 4.6-4.10\nA\n5주 4.6-4.10\nB");
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_no, 5);
        assert_eq!(weeks[1].week_no, 5);
        assert_eq!(weeks[1].events, vec!["B"]);
    }

    #[test]
    fn test_parse_full_width_header() {
        let weeks = parse("３주 ４.１-４.５\nField trip");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week_no, 3);
        assert_eq!(weeks[0].date_range, "４.１-４.５");
        assert_eq!(weeks[0].events, vec!["Field trip"]);
        assert_eq!(weeks[0].details, "TBD");
    }

    #[test]
    fn test_parse_no_headers() {
        assert!(parse("").is_empty());
        assert!(parse("Week 1: Orientation\nWeek 2: Cells").is_empty());
    }

    #[test]
    fn test_parse_stable_under_renormalization() {
        let once = normalize(SAMPLE_SYLLABUS);
        assert_eq!(parse(&normalize(&once)), parse(&once));
        assert_eq!(parse(&once), parse(SAMPLE_SYLLABUS));
    }

    #[test]
    fn test_label() {
        let weeks = parse("3주 4.1-4.5");
        assert_eq!(weeks[0].label(), "Week 3 (4.1-4.5)");
    }

    #[test]
    fn test_require_weeks() {
        assert!(matches!(require_weeks(Vec::new()), Err(Error::NoWeeksFound)));
        assert_eq!(require_weeks(parse(SAMPLE_SYLLABUS)).unwrap().len(), 4);
    }

    #[test]
    fn test_select_week() {
        let weeks = parse(SAMPLE_SYLLABUS);
        let selected = select_week(&weeks, 3).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date_range, "3.9-3.13");

        assert!(matches!(select_week(&weeks, 9), Err(Error::WeekNotFound(9))));
    }
}
