//! Whitespace normalization for extracted syllabus text

use std::sync::OnceLock;

use regex::Regex;

fn horizontal_whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("valid horizontal whitespace regex"))
}

fn blank_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid blank run regex"))
}

/// Normalize raw extracted text before week headers are located.
///
/// Runs of spaces and tabs collapse to a single space, three or more
/// consecutive newlines collapse to exactly two, and the whole document is
/// trimmed. Normalizing an already-normalized string returns it unchanged.
pub fn normalize(text: &str) -> String {
    let collapsed = horizontal_whitespace_re().replace_all(text, " ");
    let collapsed = blank_run_re().replace_all(&collapsed, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces_and_tabs() {
        assert_eq!(normalize("1주 \t  2.23-2.27"), "1주 2.23-2.27");
    }

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!(normalize("page one\n\n\n\n\npage two"), "page one\n\npage two");
    }

    #[test]
    fn test_keeps_single_blank_line() {
        assert_eq!(normalize("a\n\nb\nc"), "a\n\nb\nc");
    }

    #[test]
    fn test_trims_document() {
        assert_eq!(normalize("\n\n  title  \n"), "title");
    }

    #[test]
    fn test_whitespace_between_newlines_is_not_a_blank_run() {
        // Lines holding a single space still separate the newlines
        assert_eq!(normalize("a\n \n \nb"), "a\n \n \nb");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n\n\n "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "1주\t\t2.23-2.27\n\n\n\nIntro\t to cells\n",
            "  \n\n\n x \t\n\n\n\n y",
            "a\n \n \n\n\nb",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
