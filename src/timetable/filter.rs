use crate::timetable::model::{day_index, time_index, RawSlot, TimetableGrid};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// Lab-group / practical-section tokens: G or P, optional space, digits
    static ref GROUP_TOKEN: Regex = Regex::new(r"\b([GP])\s?(\d+)\b").unwrap();
}

/// Course codes this short are elective placeholders ("E1", "E2") and are
/// matched on word boundaries; longer codes tolerate internal whitespace
pub const SHORT_CODE_LEN: usize = 3;

/// How one normalized course code is matched against a sub-entry
enum CodeMatcher {
    /// Short elective codes, word-boundary matched against the uppercased
    /// text so "E1" cannot hit inside "SE10"
    Word(Regex),
    /// Longer codes, containment against whitespace-stripped text so
    /// "PE 302" and "PE302" are the same course
    Fragment(String),
}

impl CodeMatcher {
    fn matches(&self, upper: &str, stripped: &str) -> bool {
        match self {
            CodeMatcher::Word(re) => re.is_match(upper),
            CodeMatcher::Fragment(code) => stripped.contains(code.as_str()),
        }
    }
}

/// Split a comma-separated course list into normalized codes
pub fn parse_course_list(course_list: &str) -> Vec<String> {
    course_list
        .split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn build_matchers(courses: &[String]) -> Vec<CodeMatcher> {
    courses
        .iter()
        .map(|code| {
            let stripped = strip_whitespace(code);
            if stripped.chars().count() <= SHORT_CODE_LEN {
                match Regex::new(&format!(r"\b{}\b", regex::escape(&stripped))) {
                    Ok(re) => CodeMatcher::Word(re),
                    Err(_) => CodeMatcher::Fragment(stripped),
                }
            } else {
                CodeMatcher::Fragment(stripped)
            }
        })
        .collect()
}

/// Collect normalized group tokens ("G 1" becomes "G1") from uppercased text
fn group_tokens(upper: &str) -> Vec<String> {
    GROUP_TOKEN
        .captures_iter(upper)
        .map(|caps| format!("{}{}", &caps[1], &caps[2]))
        .collect()
}

/// Filter slot records down to the student's courses and lab group,
/// assembling the personalized weekly grid.
///
/// Each slot's text is split into its stacked sub-entries ("||" separated).
/// A sub-entry survives when some selected course matches it, and, when it
/// names one or more group tokens, the student's group equals one of them
/// exactly; text without any group token applies to every group. Survivors
/// land in their grid cell on their own lines, in input order. An empty
/// course list matches nothing, so the grid comes back empty.
pub fn filter_timetable(slots: &[RawSlot], course_list: &str, group: &str) -> TimetableGrid {
    let courses = parse_course_list(course_list);
    let matchers = build_matchers(&courses);
    let my_group = strip_whitespace(&group.trim().to_uppercase());

    let mut grid = TimetableGrid::new();
    for slot in slots {
        let (Some(d), Some(t)) = (day_index(&slot.day), time_index(&slot.time)) else {
            debug!("Skipping slot with unknown labels: {}/{}", slot.day, slot.time);
            continue;
        };
        for item in slot.raw_content.split("||") {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let upper = item.to_uppercase();
            let stripped = strip_whitespace(&upper);

            if !matchers.iter().any(|m| m.matches(&upper, &stripped)) {
                continue;
            }

            let tokens = group_tokens(&upper);
            if !tokens.is_empty() && !tokens.iter().any(|tok| *tok == my_group) {
                continue;
            }

            grid.append_entry(d, t, item);
        }
    }
    grid
}
