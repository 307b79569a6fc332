use crate::spreadsheet::cell::Scalar;
use std::collections::HashMap;

/// Sparse, read-only view of one worksheet.
///
/// Cells are addressed by 1-based (row, column) pairs, matching the
/// spreadsheet's own coordinate system. The grid is scoped to a single
/// extraction run and never mutated after loading.
#[derive(Debug, Default)]
pub struct Grid {
    /// All populated cells, keyed by (row, column)
    cells: HashMap<(u32, u32), Scalar>,
    /// Highest populated row, 0 when the grid is empty
    row_upper_bound: u32,
    /// Highest populated column, 0 when the grid is empty
    col_upper_bound: u32,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a cell value, updating the occupied bounds.
    /// Blank text is dropped so that presence implies a usable value.
    pub fn insert(&mut self, row: u32, col: u32, value: Scalar) {
        if matches!(&value, Scalar::Text(text) if text.is_empty()) {
            return;
        }
        self.row_upper_bound = self.row_upper_bound.max(row);
        self.col_upper_bound = self.col_upper_bound.max(col);
        self.cells.insert((row, col), value);
    }

    /// Looks up the cell at (row, column), or None when absent.
    pub fn value(&self, row: u32, col: u32) -> Option<&Scalar> {
        self.cells.get(&(row, col))
    }

    /// Highest populated row in the whole sheet, 0 when empty.
    pub fn last_row(&self) -> u32 {
        self.row_upper_bound
    }

    /// Highest populated column in the whole sheet, 0 when empty.
    pub fn last_column(&self) -> u32 {
        self.col_upper_bound
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}
