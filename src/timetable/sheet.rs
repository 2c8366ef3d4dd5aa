use crate::error::AppResult;
use crate::timetable::model::{TimetableGrid, DAYS, TIME_SLOTS};
use std::path::Path;

/// Header label of the corner cell
const CORNER_LABEL: &str = "Day/Time";

/// Flatten the grid into spreadsheet rows: a header row of time labels, then
/// one row per day. Spanned classes repeat their text in every covered
/// column; merging applies to the calendar export only, the sheet mirrors
/// the grid cell for cell.
pub fn to_rows(grid: &TimetableGrid) -> Vec<Vec<String>> {
    let mut header = Vec::with_capacity(TIME_SLOTS.len() + 1);
    header.push(CORNER_LABEL.to_string());
    header.extend(TIME_SLOTS.iter().map(|t| t.to_string()));

    let mut rows = vec![header];
    for (d, day) in DAYS.iter().enumerate() {
        let mut row = Vec::with_capacity(TIME_SLOTS.len() + 1);
        row.push(day.to_string());
        for t in 0..TIME_SLOTS.len() {
            row.push(grid.cell(d, t).to_string());
        }
        rows.push(row);
    }
    rows
}

/// Write the row matrix as a CSV file
pub fn write_csv(rows: &[Vec<String>], path: &Path) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Suggested download name for the spreadsheet export
pub fn spreadsheet_filename(group: &str) -> String {
    format!("Timetable_{}.xlsx", group.trim().to_uppercase())
}

/// Suggested download name for the calendar export
pub fn calendar_filename(group: &str) -> String {
    format!("University_Schedule_{}.ics", group.trim().to_uppercase())
}
