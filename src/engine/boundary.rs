//! Boundary Locator: finds the last row of the data region.
//!
//! Sheets of this shape declare no extent, so the locator scans downward in
//! row order from a generous starting hint, looking for a sentinel row that
//! explicitly marks the end of real data. A consecutive-empty-row threshold
//! bounds the scan when no sentinel exists. The previously detected row can
//! be passed back in as a memo to narrow the search window; the memo is an
//! optimization hint only and never changes the result.

use crate::engine::options::ExtractOptions;
use crate::spreadsheet::cell::Scalar;
use crate::spreadsheet::grid::Grid;

/// Result of a boundary search.
#[derive(Debug, PartialEq)]
pub struct Boundary {
    /// Last row considered part of the data region
    pub last_row: u32,
    /// New memo value, set only when a sentinel row was found
    pub memo_update: Option<u32>,
}

/// Locates the last data row within the configured column range.
///
/// Scans rows in decreasing order starting from `memo + margin` (or the
/// fallback row without a memo), clamped to the grid's own extent so a stale
/// or clearly wrong memo cannot send the scan into empty space. A memo scan
/// that finishes without a sentinel match is retried from the default start:
/// the memo narrows the first attempt only, it never hides a sentinel lying
/// outside its window. The scan has a hard floor at row 2: row 1 is reserved
/// for a title and never holds data.
pub fn locate(grid: &Grid, options: &ExtractOptions, memo: Option<u32>) -> Boundary {
    let fallback = Boundary {
        last_row: options.last_row_fallback,
        memo_update: None,
    };
    if grid.is_empty() {
        return fallback;
    }

    let default_start = options.last_row_fallback.min(grid.last_row());
    if let Some(row) = memo {
        let memo_start = row
            .saturating_add(options.memo_margin)
            .min(grid.last_row());
        if let Some(found) = scan_down(grid, options, memo_start) {
            return found;
        }
        log::debug!("Memo window from row {memo_start} missed, rescanning");
        if memo_start == default_start {
            return fallback;
        }
    }
    if let Some(found) = scan_down(grid, options, default_start) {
        return found;
    }

    log::debug!(
        "No sentinel found, falling back to row {}",
        options.last_row_fallback
    );
    fallback
}

/// One descending pass from `start`, or None when no sentinel matched.
fn scan_down(grid: &Grid, options: &ExtractOptions, start: u32) -> Option<Boundary> {
    let giveup = options.empty_row_giveup.unwrap_or(start);
    let mut consecutive_empty = 0u32;
    let mut row = start;
    while row >= 2 {
        if is_sentinel_row(grid, options, row) {
            let last_row = row - 1;
            log::debug!("Sentinel matched at row {row}, data ends at {last_row}");
            return Some(Boundary {
                last_row,
                memo_update: Some(last_row),
            });
        }
        if has_data(grid, options, row) {
            consecutive_empty = 0;
        } else {
            consecutive_empty += 1;
            if consecutive_empty > giveup {
                break;
            }
        }
        row -= 1;
    }
    None
}

/// A sentinel row carries the marker substring (case-insensitive) in the
/// first in-range cell.
fn is_sentinel_row(grid: &Grid, options: &ExtractOptions, row: u32) -> bool {
    if options.sentinel_marker.is_empty() {
        return false;
    }
    match grid.value(row, options.start_column) {
        Some(Scalar::Text(text)) => text
            .to_lowercase()
            .contains(&options.sentinel_marker.to_lowercase()),
        _ => false,
    }
}

/// Whether any cell within the column range is populated on this row.
pub(super) fn has_data(grid: &Grid, options: &ExtractOptions, row: u32) -> bool {
    (options.start_column..=options.end_column).any(|col| grid.value(row, col).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(grid: &mut Grid, row: u32, col: u32, value: &str) {
        grid.insert(row, col, Scalar::Text(value.to_owned()));
    }

    #[test]
    fn empty_grid_falls_back() {
        let grid = Grid::new();
        let found = locate(&grid, &ExtractOptions::default(), None);
        assert_eq!(found.last_row, 188);
        assert_eq!(found.memo_update, None);
    }

    #[test]
    fn sentinel_excludes_its_own_row() {
        let mut grid = Grid::new();
        text(&mut grid, 5, 3, "Company");
        text(&mut grid, 6, 3, "Acme");
        text(&mut grid, 8, 3, "Manual ADDS below");
        let found = locate(&grid, &ExtractOptions::default(), None);
        assert_eq!(found.last_row, 7);
        assert_eq!(found.memo_update, Some(7));
    }

    #[test]
    fn sentinel_is_case_insensitive_substring() {
        let mut options = ExtractOptions::default();
        options.sentinel_marker = "End Of Data".to_owned();
        let mut grid = Grid::new();
        text(&mut grid, 4, 3, "x");
        text(&mut grid, 10, 3, "-- end of data --");
        assert_eq!(locate(&grid, &options, None).last_row, 9);
    }

    #[test]
    fn empty_marker_disables_sentinel() {
        let mut options = ExtractOptions::default();
        options.sentinel_marker = String::new();
        let mut grid = Grid::new();
        text(&mut grid, 10, 3, "anything");
        assert_eq!(locate(&grid, &options, None).last_row, options.last_row_fallback);
    }

    #[test]
    fn no_sentinel_falls_back_after_giveup() {
        let mut options = ExtractOptions::default();
        options.empty_row_giveup = Some(3);
        let mut grid = Grid::new();
        text(&mut grid, 200, 3, "far away value");
        text(&mut grid, 20, 3, "data");
        // Without a memo the scan starts at the fallback row 188; everything
        // below it is empty and exhausts the threshold before row 20.
        let found = locate(&grid, &options, None);
        assert_eq!(found.last_row, 188);
        assert_eq!(found.memo_update, None);
    }

    #[test]
    fn stale_memo_is_clamped_to_grid_extent() {
        let mut grid = Grid::new();
        text(&mut grid, 6, 3, "Acme");
        text(&mut grid, 9, 3, "manual adds");
        let found = locate(&grid, &ExtractOptions::default(), Some(1_000_000));
        assert_eq!(found.last_row, 8);
        assert_eq!(found.memo_update, Some(8));
    }

    #[test]
    fn stale_low_memo_still_finds_the_sentinel() {
        let mut grid = Grid::new();
        text(&mut grid, 95, 3, "Company");
        text(&mut grid, 96, 3, "Acme");
        text(&mut grid, 100, 3, "manual adds below");
        // The memo window tops out at 1 + 50 = 51, well below the sentinel;
        // the rescan from the default start must still find it.
        let found = locate(&grid, &ExtractOptions::default(), Some(1));
        assert_eq!(found.last_row, 99);
        assert_eq!(found.memo_update, Some(99));
        assert_eq!(found, locate(&grid, &ExtractOptions::default(), None));
    }

    #[test]
    fn huge_memo_does_not_overflow() {
        let mut grid = Grid::new();
        text(&mut grid, 6, 3, "Acme");
        text(&mut grid, 9, 3, "manual adds");
        let found = locate(&grid, &ExtractOptions::default(), Some(u32::MAX - 10));
        assert_eq!(found.last_row, 8);
    }

    #[test]
    fn memo_narrows_the_starting_row() {
        let mut grid = Grid::new();
        text(&mut grid, 30, 3, "adds marker");
        // Without the clamp the hint would be 10 + 50 = 60; the grid tops out
        // at 30 so the scan starts right at the sentinel.
        let found = locate(&grid, &ExtractOptions::default(), Some(10));
        assert_eq!(found.last_row, 29);
    }
}
