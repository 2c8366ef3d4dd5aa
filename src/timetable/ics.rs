use crate::timetable::filter::{parse_course_list, SHORT_CODE_LEN};
use crate::timetable::model::{day_index, Block, TIME_SLOTS};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use icalendar::{
    Alarm, Calendar, CalendarDateTime, Component, Event, EventLike, EventStatus, Property,
};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

lazy_static! {
    /// Course-code shaped tokens: 1-4 letters and 1-3 digits, optionally
    /// separated by a space or dash ("PE302", "PE 302", "CS-101")
    static ref COURSE_CODE: Regex = Regex::new(r"\b([A-Za-z]{1,4})[ -]?(\d{1,3})\b").unwrap();
}

/// Display reminder offset before each class, in minutes
const REMINDER_MINUTES: i64 = 10;

/// Build a complete iCalendar document from the merged schedule blocks.
///
/// Each non-blank line of a block's content becomes its own weekly-recurring
/// VEVENT (a block holding two stacked classes yields two events at the same
/// time). The first occurrence is projected strictly forward from
/// `reference`, and the recurrence runs until the end of the current
/// academic term. All date-times are floating local time, the source grid
/// has no timezone concept; importers apply their own.
pub fn build_calendar(blocks: &[Block], reference: NaiveDateTime, course_list: &str) -> String {
    let short_codes = short_code_matchers(course_list);

    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("METHOD", "PUBLISH"));

    for block in blocks {
        let Some(start_date) = next_occurrence(reference.date(), &block.day) else {
            continue;
        };
        let Some(label) = TIME_SLOTS.get(block.start) else {
            continue;
        };
        let Some(start_hour) = slot_start_hour(label) else {
            continue;
        };
        let end_hour = start_hour + block.span as u32;
        let (Some(start_dt), Some(end_dt)) = (
            start_date.and_hms_opt(start_hour, 0, 0),
            start_date.and_hms_opt(end_hour, 0, 0),
        ) else {
            continue;
        };
        let Some(until) = term_end(reference.date()) else {
            continue;
        };

        let full_text = block.content.replace('\n', " ");
        let location: String = full_text.chars().take(60).collect();
        let rrule = format!("FREQ=WEEKLY;UNTIL={}", until.format("%Y%m%dT%H%M%S"));

        for line in block.content.lines() {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            let mut event = Event::new();
            event
                .uid(&Uuid::new_v4().to_string())
                .summary(&extract_title(text, &short_codes))
                .description(&full_text)
                .location(&location)
                .starts(CalendarDateTime::Floating(start_dt))
                .ends(CalendarDateTime::Floating(end_dt))
                .status(EventStatus::Confirmed);
            event.add_property("SEQUENCE", "0");
            event.add_property("RRULE", &rrule);
            event.alarm(Alarm::display(
                "Class starts in 10 minutes",
                -Duration::minutes(REMINDER_MINUTES),
            ));
            calendar.push(event.done());
        }
    }

    calendar.done().to_string()
}

/// Word-boundary matchers for the user's short elective codes, used by the
/// title heuristic
fn short_code_matchers(course_list: &str) -> Vec<(String, Regex)> {
    parse_course_list(course_list)
        .into_iter()
        .filter(|code| code.chars().count() <= SHORT_CODE_LEN)
        .filter_map(|code| {
            Regex::new(&format!(r"\b{}\b", regex::escape(&code)))
                .ok()
                .map(|re| (code, re))
        })
        .collect()
}

/// Starting wall-clock hour of a time-slot label. Labels carry no AM/PM
/// marker; the teaching day runs 8 AM through 6 PM, so leading hours 1..=6
/// are afternoon hours and 12 stays noon.
fn slot_start_hour(label: &str) -> Option<u32> {
    let lead: u32 = label.split('-').next()?.trim().parse().ok()?;
    Some(if (1..=6).contains(&lead) { lead + 12 } else { lead })
}

/// Next occurrence of the target weekday on or after the reference date
fn next_occurrence(reference: NaiveDate, day: &str) -> Option<NaiveDate> {
    // MON=1 .. FRI=5 in a Sun=0 .. Sat=6 week
    let target = day_index(day)? as i64 + 1;
    let current = reference.weekday().num_days_from_sunday() as i64;
    let mut delta = target - current;
    if delta < 0 {
        delta += 7;
    }
    Some(reference + Duration::days(delta))
}

/// End of the running academic term: the spring half (Jan-May) closes
/// May 1, everything else closes Dec 1 of the same year. The boundaries are
/// policy constants of the two-term calendar, not derived from course data.
fn term_end(reference: NaiveDate) -> Option<NaiveDateTime> {
    let (month, day) = if reference.month() <= 5 { (5, 1) } else { (12, 1) };
    NaiveDate::from_ymd_opt(reference.year(), month, day)?.and_hms_opt(23, 59, 59)
}

/// Pick a short event title out of noisy class text, in priority order: a
/// user-selected elective code, then a course-code shaped token, then the
/// token after a leading session marker (P/L), then the first token.
fn extract_title(text: &str, short_codes: &[(String, Regex)]) -> String {
    let upper = text.to_uppercase();
    for (code, re) in short_codes {
        if re.is_match(&upper) {
            return code.clone();
        }
    }

    if let Some(caps) = COURSE_CODE.captures(text) {
        return format!("{}{}", caps[1].to_uppercase(), &caps[2]);
    }

    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) if matches!(first.to_uppercase().as_str(), "P" | "L") => {
            second.to_string()
        }
        (Some(first), _) => first.to_string(),
        (None, _) => String::new(),
    }
}
