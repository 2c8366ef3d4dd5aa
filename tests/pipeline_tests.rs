use chrono::{NaiveDate, NaiveDateTime};
use unitable::timetable::{filter, ics, merge, parser, sheet, RawSlot, TimetableGrid};

fn slot(day: &str, time: &str, content: &str) -> RawSlot {
    RawSlot {
        day: day.to_string(),
        time: time.to_string(),
        raw_content: content.to_string(),
    }
}

// 2026-01-07 is a Wednesday
fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 7)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

/// The documented end-to-end scenario: a stacked slot is filtered down to
/// the student's course, everything else drops out
#[test]
fn test_filter_scenario_keeps_only_selected_course() {
    let slots = vec![slot("MON", "9-10", "L PE302 PROF.A || L HU302 PROF.B")];
    let grid = filter::filter_timetable(&slots, "PE302", "G3");

    assert_eq!(grid.get("MON", "9-10"), Some("L PE302 PROF.A"));
    assert_eq!(grid.occupied_cells(), 1);
}

/// Raw text with several embedded day arrays and one broken chunk still
/// yields the good days' slots
#[test]
fn test_partial_extraction_survives_bad_chunks() {
    let response = r#"Monday went fine:
[{"day": "MON", "time": "11-12", "raw_content": "P PE 302 LAB G1 MUKESH S D"},
 {"day": "MON", "time": "12-1", "raw_content": "P PE 302 LAB G1 MUKESH S D"}]
Tuesday failed: [garbage, not json]
[{"day": "WED", "time": "8-9", "raw_content": "L HU302 PROF.B"}]"#;

    let slots = parser::parse(response);
    assert_eq!(slots.len(), 3);

    let grid = filter::filter_timetable(&slots, "PE302, HU302", "G1");
    assert_eq!(grid.get("MON", "11-12"), Some("P PE 302 LAB G1 MUKESH S D"));
    assert_eq!(grid.get("WED", "8-9"), Some("L HU302 PROF.B"));
}

/// A lab spanning two hourly columns merges into one block and produces one
/// two-hour recurring event
#[test]
fn test_spanning_lab_becomes_one_two_hour_event() {
    let slots = vec![
        slot("MON", "11-12", "P PE 302 LAB G1 MUKESH S D"),
        slot("MON", "12-1", "P PE 302 LAB G1 MUKESH S D"),
    ];
    let grid = filter::filter_timetable(&slots, "PE302", "G1");
    let blocks = merge::merge_grid(&grid);

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].start, 3);
    assert_eq!(blocks[0].span, 2);

    let calendar = ics::build_calendar(&blocks, reference(), "PE302");
    // upcoming Monday from the Wednesday reference, 11:00 through 13:00
    assert!(calendar.contains("DTSTART:20260112T110000"));
    assert!(calendar.contains("DTEND:20260112T130000"));
    assert!(calendar.contains("RRULE:FREQ=WEEKLY;UNTIL=20260501T235959"));
    assert_eq!(calendar.matches("BEGIN:VEVENT").count(), 1);
}

/// Two classes stacked in one merged block export as two simultaneous
/// events, while the spreadsheet repeats the raw cell per column
#[test]
fn test_stacked_block_exports_diverge_by_format() {
    let slots = vec![
        slot("THU", "2-3", "E1 Lab || E2 Lab"),
        slot("THU", "3-4", "E1 Lab || E2 Lab"),
    ];
    let grid = filter::filter_timetable(&slots, "E1, E2", "G1");
    let blocks = merge::merge_grid(&grid);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].span, 2);

    let calendar = ics::build_calendar(&blocks, reference(), "E1, E2");
    assert_eq!(calendar.matches("BEGIN:VEVENT").count(), 2);

    let rows = sheet::to_rows(&grid);
    // THU row, columns "2-3" and "3-4" repeat the stacked text
    assert_eq!(rows[4][7], "E1 Lab\nE2 Lab");
    assert_eq!(rows[4][8], "E1 Lab\nE2 Lab");
}

/// Editing one hour of a spanned class splits the block without any
/// explicit split operation
#[test]
fn test_manual_edit_splits_merged_block() {
    let slots = vec![
        slot("MON", "10-11", "L PE302"),
        slot("MON", "11-12", "L PE302"),
    ];
    let mut grid = filter::filter_timetable(&slots, "PE302", "G1");
    assert_eq!(merge::merge_day(&grid, "MON").len(), 1);

    grid.set_cell("MON", "11-12", "L PE302 (moved)");
    let blocks = merge::merge_day(&grid, "MON");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].span, 1);
    assert_eq!(blocks[1].span, 1);
}

/// Re-deriving from the same raw extraction is byte-stable across the whole
/// pipeline
#[test]
fn test_pipeline_is_pure() {
    let response = r#"[
        {"day": "MON", "time": "9-10", "raw_content": "L PE302 PROF.A || L HU302 PROF.B"},
        {"day": "TUE", "time": "1-2", "raw_content": "P PE302 LAB G2"},
        {"day": "TUE", "time": "2-3", "raw_content": "P PE302 LAB G2"}
    ]"#;

    let run = || {
        let slots = parser::parse(response);
        let grid = filter::filter_timetable(&slots, "PE302, HU302", "G2");
        let blocks = merge::merge_grid(&grid);
        (sheet::to_rows(&grid), blocks)
    };

    let (rows_a, blocks_a) = run();
    let (rows_b, blocks_b) = run();
    assert_eq!(rows_a, rows_b);
    assert_eq!(blocks_a, blocks_b);
}

/// Unusable input flows through as an empty result, not an error
#[test]
fn test_empty_pipeline_degrades_gracefully() {
    let slots = parser::parse("the model refused to answer");
    assert!(slots.is_empty());

    let grid = filter::filter_timetable(&slots, "PE302", "G1");
    assert!(grid.is_empty());
    assert_eq!(grid, TimetableGrid::new());

    let blocks = merge::merge_grid(&grid);
    assert!(blocks.is_empty());

    let calendar = ics::build_calendar(&blocks, reference(), "PE302");
    assert!(calendar.contains("BEGIN:VCALENDAR"));
    assert_eq!(calendar.matches("BEGIN:VEVENT").count(), 0);

    let rows = sheet::to_rows(&grid);
    assert_eq!(rows.len(), 6);
}
