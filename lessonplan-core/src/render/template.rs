//! Plain-text lesson plan template

use super::PresentationOptions;
use crate::syllabus::WeekRecord;

/// Bullet shown when a week lists no events
pub const NO_EVENTS_PLACEHOLDER: &str = "(No special events listed)";

/// Shown when no class-plan note was given
pub const NO_CLASS_PLAN_NOTE: &str = "(No additional class plan note provided)";

/// Line placed before the lesson phases when enabled
pub const OPENING_LINE: &str = "Start with a prayer.";

/// Closes every rendered week
pub const WEEK_SEPARATOR: &str = "--------------------------------------------";

/// Render one week as a lesson plan and empty report.
///
/// Never fails: empty option values are interpolated as-is.
pub fn render_week(week: &WeekRecord, options: &PresentationOptions) -> String {
    let events_text = if week.events.is_empty() {
        format!("- {}", NO_EVENTS_PLACEHOLDER)
    } else {
        week.events
            .iter()
            .map(|event| format!("- {}", event))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let opening_line = if options.include_opening_line {
        format!("{}\n", OPENING_LINE)
    } else {
        String::new()
    };

    format!(
        "Week {week_no} ({date_range})

Teacher: {teacher}
Class: {class}
Subject: {subject}
Schedule: {schedule}

Teacher class plan input
- {class_plan}

Materials
- Teacher: {teacher_materials}
- Student: {student_materials}

Syllabus focus
{events_text}

Class Theme & Goal
Theme: Week {week_no} — Sections {details}
Goals:
- Cover textbook sections: {details}
- Check understanding with quick oral questions + one short written check
- Collect or spot-check homework

Lesson Plan (template)
{opening_line}Intro (5–10 min): Warm-up review from last week + key vocabulary preview.
Development (25–35 min): Direct teaching + guided reading/discussion + mini-lab/demo if relevant.
Practice (10–15 min): Workbook/questions + partner check.
End (5 min): Exit ticket + homework reminder.

Report (to fill after teaching)
Evaluation:
- What went well:
- What needs improvement:

Issues on students:
- (Name) —
- (Name) —

{separator}

",
        week_no = week.week_no,
        date_range = week.date_range,
        teacher = options.teacher_name,
        class = options.class_name,
        subject = options.subject_line(),
        schedule = options.schedule_note,
        class_plan = options.class_plan_line(),
        teacher_materials = options.teacher_materials,
        student_materials = options.student_materials,
        events_text = events_text,
        details = week.details,
        opening_line = opening_line,
        separator = WEEK_SEPARATOR,
    )
}

/// Render a title block followed by every week, in the order given.
pub fn render_document(
    weeks: &[WeekRecord],
    title: &str,
    options: &PresentationOptions,
) -> String {
    let header = format!(
        "{}

(Generated automatically from syllabus PDF)

============================================

",
        title
    );

    weeks.iter().fold(header, |mut doc, week| {
        doc.push_str(&render_week(week, options));
        doc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(week_no: u32, events: &[&str], details: &str) -> WeekRecord {
        WeekRecord {
            week_no,
            date_range: "4.1-4.5".to_string(),
            events: events.iter().map(|e| e.to_string()).collect(),
            details: details.to_string(),
        }
    }

    fn empty_options() -> PresentationOptions {
        PresentationOptions {
            teacher_name: String::new(),
            class_name: String::new(),
            schedule_note: String::new(),
            teacher_materials: String::new(),
            student_materials: String::new(),
            include_opening_line: false,
            subject: Some(String::new()),
            class_plan_note: Some(String::new()),
        }
    }

    #[test]
    fn test_render_week_header_and_events() {
        let record = week(3, &["Intro to cells", "Lab safety"], "3A, 3B");
        let text = render_week(&record, &PresentationOptions::default());

        assert!(text.starts_with("Week 3 (4.1-4.5)\n"));
        assert!(text.contains("- Intro to cells\n- Lab safety\n"));
        assert!(text.contains("Theme: Week 3 — Sections 3A, 3B"));
        assert!(text.contains("- Cover textbook sections: 3A, 3B"));
        assert!(!text.contains(NO_EVENTS_PLACEHOLDER));
    }

    #[test]
    fn test_render_week_empty_events_placeholder() {
        let text = render_week(&week(4, &[], "TBD"), &PresentationOptions::default());
        assert!(text.contains("Syllabus focus\n- (No special events listed)\n"));
        assert!(text.contains("Sections TBD"));
    }

    #[test]
    fn test_render_week_options() {
        let options = PresentationOptions {
            teacher_name: "Ms. Park".to_string(),
            subject: Some("Biology".to_string()),
            class_plan_note: Some("Microscope lab".to_string()),
            ..Default::default()
        };
        let text = render_week(&week(1, &["Orientation"], "1A"), &options);

        assert!(text.contains("Teacher: Ms. Park\n"));
        assert!(text.contains("Class: Life Science (G6)\n"));
        assert!(text.contains("Subject: Biology\n"));
        assert!(text.contains("Teacher class plan input\n- Microscope lab\n"));
        assert!(text.contains("- Teacher: Whiteboard marker, slides/handouts, textbook, timer\n"));
    }

    #[test]
    fn test_render_week_opening_line() {
        let record = week(1, &[], "TBD");
        let mut options = PresentationOptions::default();

        let without = render_week(&record, &options);
        assert!(!without.contains(OPENING_LINE));
        assert!(without.contains("Lesson Plan (template)\nIntro (5–10 min)"));

        options.include_opening_line = true;
        let with = render_week(&record, &options);
        assert!(with.contains("Lesson Plan (template)\nStart with a prayer.\nIntro (5–10 min)"));
    }

    #[test]
    fn test_render_week_phases_and_report() {
        let text = render_week(&week(2, &[], "TBD"), &PresentationOptions::default());
        for phase in ["Intro (5–10 min)", "Development (25–35 min)", "Practice (10–15 min)", "End (5 min)"] {
            assert!(text.contains(phase), "missing phase {}", phase);
        }
        assert!(text.contains("Report (to fill after teaching)\nEvaluation:\n- What went well:\n"));
        assert!(text.ends_with(&format!("{}\n\n", WEEK_SEPARATOR)));
    }

    #[test]
    fn test_render_week_with_empty_options() {
        let record = week(7, &["Quiz"], "7A");
        let text = render_week(&record, &empty_options());

        assert!(text.contains("Week 7 (4.1-4.5)"));
        assert!(text.contains("- Quiz"));
        assert!(text.contains("Teacher: \n"));
        assert!(text.contains("Subject: \n"));
        assert!(text.contains(NO_CLASS_PLAN_NOTE));
    }

    #[test]
    fn test_render_document_blocks_in_order() {
        let weeks = vec![week(2, &["B"], "TBD"), week(1, &["A"], "TBD"), week(2, &["C"], "TBD")];
        let doc = render_document(&weeks, "My Plan", &PresentationOptions::default());

        assert!(doc.starts_with("My Plan\n\n(Generated automatically from syllabus PDF)\n"));
        assert_eq!(doc.matches(WEEK_SEPARATOR).count(), 3);

        let positions: Vec<usize> = ["- B\n", "- A\n", "- C\n"]
            .iter()
            .map(|needle| doc.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_render_document_no_weeks() {
        let doc = render_document(&[], "Empty", &PresentationOptions::default());
        assert!(doc.starts_with("Empty\n"));
        assert_eq!(doc.matches(WEEK_SEPARATOR).count(), 0);
    }
}
