use serde::{Deserialize, Serialize};

/// Weekday labels of the teaching week, in grid row order
pub const DAYS: [&str; 5] = ["MON", "TUE", "WED", "THU", "FRI"];

/// Hourly column labels, in grid column order (8 AM through 6 PM)
pub const TIME_SLOTS: [&str; 10] = [
    "8-9", "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5", "5-6",
];

/// One cell occupant as delivered by the extraction step, before filtering.
/// Several slots may target the same `(day, time)` cell when they come from
/// different source fragments; all of them are considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlot {
    /// Day label (MON..FRI, any case on input)
    pub day: String,
    /// Hour-range label ("8-9" .. "5-6")
    pub time: String,
    /// Cell text; multiple stacked classes are joined with " || "
    pub raw_content: String,
}

/// Row index for a day label, case-insensitive
pub fn day_index(label: &str) -> Option<usize> {
    let upper = label.trim().to_uppercase();
    DAYS.iter().position(|d| *d == upper)
}

/// Column index for an hour-range label
pub fn time_index(label: &str) -> Option<usize> {
    let trimmed = label.trim();
    TIME_SLOTS.iter().position(|t| *t == trimmed)
}

/// The personalized weekly grid: 5 days x 10 hourly columns. Every cell is
/// present from construction (an empty string, never an absent key), so
/// consumers never need existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableGrid {
    cells: Vec<Vec<String>>,
}

impl TimetableGrid {
    /// Create an empty grid with all 50 cells initialized
    pub fn new() -> Self {
        Self {
            cells: vec![vec![String::new(); TIME_SLOTS.len()]; DAYS.len()],
        }
    }

    /// Cell content by row/column index
    pub fn cell(&self, day_idx: usize, time_idx: usize) -> &str {
        &self.cells[day_idx][time_idx]
    }

    /// Cell content by labels; `None` for an unknown day or time label
    pub fn get(&self, day: &str, time: &str) -> Option<&str> {
        let d = day_index(day)?;
        let t = time_index(time)?;
        Some(self.cell(d, t))
    }

    /// Overwrite one cell, e.g. from a manual correction pass. Editing one
    /// column of a run of identical cells splits the merged block on the
    /// next merge pass. Returns false for unknown labels.
    pub fn set_cell(&mut self, day: &str, time: &str, text: &str) -> bool {
        match (day_index(day), time_index(time)) {
            (Some(d), Some(t)) => {
                self.cells[d][t] = text.trim().to_string();
                true
            }
            _ => false,
        }
    }

    /// Append one surviving sub-entry to a cell, stacking entries on their
    /// own lines in input order
    pub fn append_entry(&mut self, day_idx: usize, time_idx: usize, entry: &str) {
        let cell = &mut self.cells[day_idx][time_idx];
        if !cell.is_empty() {
            cell.push('\n');
        }
        cell.push_str(entry);
    }

    /// True when no cell holds any content
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.is_empty())
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }
}

impl Default for TimetableGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// A maximal run of contiguous columns within one day whose cell content is
/// identical and non-empty. Runs never overlap and are ordered by `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Day label (MON..FRI)
    pub day: String,
    /// Index of the first covered column in [`TIME_SLOTS`]
    pub start: usize,
    /// Count of consecutive covered columns
    pub span: usize,
    /// The shared cell text, possibly multiple stacked lines
    pub content: String,
}
