use crate::timetable::model::{day_index, Block, TimetableGrid, DAYS, TIME_SLOTS};

/// Merge one day's row into spanning blocks.
///
/// A single left-to-right pass: an empty cell advances by one column, a
/// non-empty cell extends its span while the next column's content is
/// exactly equal. Equality is on the raw cell text, not on any parsed
/// meaning, so two different classes that happen to produce identical text
/// merge into one block; conversely, editing one column of a spanned class
/// splits the block on the next pass with no explicit split operation.
pub fn merge_day(grid: &TimetableGrid, day: &str) -> Vec<Block> {
    match day_index(day) {
        Some(d) => merge_row(grid, d),
        None => Vec::new(),
    }
}

/// All days' blocks, in day order then column order
pub fn merge_grid(grid: &TimetableGrid) -> Vec<Block> {
    (0..DAYS.len()).flat_map(|d| merge_row(grid, d)).collect()
}

fn merge_row(grid: &TimetableGrid, d: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < TIME_SLOTS.len() {
        let content = grid.cell(d, i);
        if content.is_empty() {
            i += 1;
            continue;
        }
        let mut span = 1;
        while i + span < TIME_SLOTS.len() && grid.cell(d, i + span) == content {
            span += 1;
        }
        blocks.push(Block {
            day: DAYS[d].to_string(),
            start: i,
            span,
            content: content.to_string(),
        });
        i += span;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_row(day: &str, cells: &[&str]) -> TimetableGrid {
        let mut grid = TimetableGrid::new();
        for (i, content) in cells.iter().enumerate() {
            grid.set_cell(day, TIME_SLOTS[i], content);
        }
        grid
    }

    #[test]
    fn test_merge_contiguous_identical_cells() {
        let grid = grid_with_row("MON", &["MATH", "MATH", "MATH", "", "PHYS"]);
        let blocks = merge_day(&grid, "MON");
        assert_eq!(
            blocks,
            vec![
                Block {
                    day: "MON".to_string(),
                    start: 0,
                    span: 3,
                    content: "MATH".to_string()
                },
                Block {
                    day: "MON".to_string(),
                    start: 4,
                    span: 1,
                    content: "PHYS".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_editing_a_cell_splits_the_block() {
        let mut grid = grid_with_row("MON", &["MATH", "MATH", "MATH", "", "PHYS"]);
        grid.set_cell("MON", "9-10", "MATH2");
        let blocks = merge_day(&grid, "MON");
        let spans: Vec<(usize, usize, &str)> = blocks
            .iter()
            .map(|b| (b.start, b.span, b.content.as_str()))
            .collect();
        assert_eq!(
            spans,
            vec![(0, 1, "MATH"), (1, 1, "MATH2"), (2, 1, "MATH"), (4, 1, "PHYS")]
        );
    }

    #[test]
    fn test_identical_text_merges_even_across_distinct_classes() {
        // content-equality based merging is a documented limitation: two
        // unrelated classes with coincidentally identical text become one
        // block, and that is the intended behavior
        let grid = grid_with_row("TUE", &["L PE302", "L PE302"]);
        let blocks = merge_day(&grid, "TUE");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].span, 2);
    }

    #[test]
    fn test_blocks_are_ordered_and_disjoint() {
        let grid = grid_with_row(
            "WED",
            &["A", "A", "B", "B", "", "C", "", "D", "D", "D"],
        );
        let blocks = merge_day(&grid, "WED");
        let mut last_end = 0;
        for block in &blocks {
            assert!(block.start >= last_end);
            last_end = block.start + block.span;
        }
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3].start, 7);
        assert_eq!(blocks[3].span, 3);
    }

    #[test]
    fn test_empty_row_yields_no_blocks() {
        let grid = TimetableGrid::new();
        assert!(merge_day(&grid, "THU").is_empty());
        assert!(merge_grid(&grid).is_empty());
    }

    #[test]
    fn test_merge_grid_covers_all_days() {
        let mut grid = TimetableGrid::new();
        grid.set_cell("MON", "8-9", "A");
        grid.set_cell("FRI", "5-6", "B");
        let blocks = merge_grid(&grid);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].day, "MON");
        assert_eq!(blocks[1].day, "FRI");
    }
}
