//! Table Segmenter & Materializer: turns the bounded row interval into an
//! ordered sequence of tables.
//!
//! A header row declares the field names for the table beneath it; data rows
//! follow until an empty row or the next header. The collection order of the
//! table starts doubles as the table index used for sector and synthetic
//! entity naming downstream.

use crate::engine::boundary::has_data;
use crate::engine::options::ExtractOptions;
use crate::spreadsheet::cell::Scalar;
use crate::spreadsheet::grid::Grid;
use indexmap::IndexMap;
use serde::Serialize;

/// One materialized row: field name to scalar value, in field order.
pub type Record = IndexMap<String, Scalar>;

/// One detected table with its materialized records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Row holding the header
    pub start_row: u32,
    /// Field names read left-to-right from the header row
    pub fields: Vec<String>,
    /// Materialized records, after the trailing-row skip
    pub records: Vec<Record>,
}

/// A header row starts with a non-empty string (not a subtotal marker) in the
/// first in-range column, with at least one of the next two columns populated.
/// This rejects numeric-only rows, single-cell notes, and "Total" rows.
pub(super) fn is_header_row(grid: &Grid, options: &ExtractOptions, row: u32) -> bool {
    let Some(Scalar::Text(first)) = grid.value(row, options.start_column) else {
        return false;
    };
    if !options.total_marker.is_empty() && first.contains(&options.total_marker) {
        return false;
    }
    grid.value(row, options.start_column + 1).is_some()
        || grid.value(row, options.start_column + 2).is_some()
}

/// An empty row has no populated cell anywhere in the column range.
pub(super) fn is_empty_row(grid: &Grid, options: &ExtractOptions, row: u32) -> bool {
    !has_data(grid, options, row)
}

/// Collects every header row within `[data_start_row, last_row]`, in
/// ascending row order.
pub fn find_table_starts(grid: &Grid, options: &ExtractOptions, last_row: u32) -> Vec<u32> {
    (options.data_start_row..=last_row)
        .filter(|row| is_header_row(grid, options, *row) && !is_empty_row(grid, options, *row))
        .collect()
}

/// Materializes the table starting at `start_row`.
///
/// Field names are the header row's non-empty cells in encounter order;
/// records pair each field with the cell at the same relative column offset.
/// Rows with no populated fields are skipped without ending the walk. The
/// last materialized record is removed unconditionally: the source sheets
/// carry a trailing artifact row per table, and dropping it is a fixed,
/// reproducible rule rather than content-dependent cleanup.
pub fn materialize(grid: &Grid, options: &ExtractOptions, start_row: u32, last_row: u32) -> Table {
    let mut fields = Vec::<String>::new();
    for col in options.start_column..=options.end_column {
        if let Some(value) = grid.value(start_row, col) {
            fields.push(value.to_string());
        }
    }

    let mut records = Vec::<Record>::new();
    let mut row = start_row + 1;
    while row <= last_row {
        if is_empty_row(grid, options, row) || is_header_row(grid, options, row) {
            break;
        }
        let mut record = Record::new();
        for (offset, field) in fields.iter().enumerate() {
            if let Some(value) = grid.value(row, options.start_column + offset as u32) {
                record.insert(field.to_owned(), value.to_owned());
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
        row += 1;
    }
    // Trailing-row skip; a no-op on an empty table
    records.pop();

    Table {
        start_row,
        fields,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(grid: &mut Grid, row: u32, col: u32, value: &str) {
        grid.insert(row, col, Scalar::Text(value.to_owned()));
    }

    fn number(grid: &mut Grid, row: u32, col: u32, value: f64) {
        grid.insert(row, col, Scalar::Number(value));
    }

    #[test]
    fn header_requires_text_first_cell_and_a_neighbor() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        text(&mut grid, 2, 4, "Ticker");
        assert!(is_header_row(&grid, &options, 2));

        // Single populated cell in range
        text(&mut grid, 3, 3, "just a note");
        assert!(!is_header_row(&grid, &options, 3));

        // Numeric first cell
        number(&mut grid, 4, 3, 12.0);
        number(&mut grid, 4, 4, 34.0);
        assert!(!is_header_row(&grid, &options, 4));

        // Subtotal row
        text(&mut grid, 5, 3, "Total holdings");
        number(&mut grid, 5, 4, 99.0);
        assert!(!is_header_row(&grid, &options, 5));
    }

    #[test]
    fn header_neighbor_may_be_two_columns_over() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Coin");
        number(&mut grid, 2, 5, 1.0);
        assert!(is_header_row(&grid, &options, 2));
    }

    #[test]
    fn empty_row_checks_the_whole_range() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        number(&mut grid, 7, 29, 5.0); // last in-range column
        number(&mut grid, 8, 30, 5.0); // outside the range
        assert!(!is_empty_row(&grid, &options, 7));
        assert!(is_empty_row(&grid, &options, 8));
    }

    #[test]
    fn starts_are_collected_in_ascending_order() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 5, 3, "Company");
        text(&mut grid, 5, 4, "Ticker");
        text(&mut grid, 10, 3, "Coin");
        text(&mut grid, 10, 4, "Current price");
        assert_eq!(find_table_starts(&grid, &options, 12), vec![5, 10]);
        // Bounding interval cuts off the second table
        assert_eq!(find_table_starts(&grid, &options, 7), vec![5]);
    }

    #[test]
    fn fields_skip_absent_header_cells() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        // Column D absent
        text(&mut grid, 2, 5, "Current price");
        let table = materialize(&grid, &options, 2, 10);
        assert_eq!(table.fields, vec!["Company", "Current price"]);
    }

    #[test]
    fn records_zip_by_relative_offset() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "ID");
        text(&mut grid, 2, 5, "Current price");
        // Fields are [ID, Current price] but values pair with columns C and
        // D, the relative offsets, not the header cells' own columns.
        number(&mut grid, 3, 3, 7.0);
        number(&mut grid, 3, 4, 19.5);
        number(&mut grid, 4, 3, 8.0);
        let table = materialize(&grid, &options, 2, 10);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].get("ID"), Some(&Scalar::Number(7.0)));
        assert_eq!(
            table.records[0].get("Current price"),
            Some(&Scalar::Number(19.5))
        );
    }

    #[test]
    fn walk_stops_at_empty_row_or_next_header() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        text(&mut grid, 2, 4, "Ticker");
        text(&mut grid, 3, 3, "Acme");
        text(&mut grid, 4, 3, "Blorp");
        // Row 5 empty, row 6 is the next header
        text(&mut grid, 6, 3, "Coin");
        text(&mut grid, 6, 4, "Current price");
        text(&mut grid, 7, 3, "BTC");
        let table = materialize(&grid, &options, 2, 10);
        assert_eq!(table.records.len(), 1); // two walked, one removed
        assert_eq!(
            table.records[0].get("Company"),
            Some(&Scalar::Text("Acme".to_owned()))
        );
    }

    #[test]
    fn skipped_rows_do_not_end_the_walk() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        text(&mut grid, 2, 4, "Ticker");
        text(&mut grid, 3, 3, "Acme");
        // Row 4 only populated outside the fields' offsets: walked, skipped
        number(&mut grid, 4, 20, 1.0);
        text(&mut grid, 5, 3, "Blorp");
        let table = materialize(&grid, &options, 2, 10);
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn trailing_record_always_removed() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        text(&mut grid, 2, 4, "Ticker");
        text(&mut grid, 3, 3, "Only row");
        let table = materialize(&grid, &options, 2, 10);
        assert!(table.records.is_empty());
    }

    #[test]
    fn header_followed_by_header_yields_empty_table() {
        let options = ExtractOptions::default();
        let mut grid = Grid::new();
        text(&mut grid, 2, 3, "Company");
        text(&mut grid, 2, 4, "Ticker");
        text(&mut grid, 3, 3, "Coin");
        text(&mut grid, 3, 4, "Current price");
        let table = materialize(&grid, &options, 2, 10);
        assert!(table.records.is_empty());
        assert_eq!(table.fields, vec!["Company", "Ticker"]);
    }
}
