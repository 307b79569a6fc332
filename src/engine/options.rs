use crate::engine::EngineError;
use crate::spreadsheet::reference::column_to_index;

/// Configuration for one extraction run.
///
/// The column range is fixed for the entire run; every row scan is bounded by
/// `[start_column, end_column]` and columns outside it are never read. The
/// sentinel and total markers are configurable because both are heuristics
/// inherited from one specific sheet layout.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// First column of the scan range, 1-based (default "C")
    pub start_column: u32,
    /// Last column of the scan range, 1-based inclusive (default "AC")
    pub end_column: u32,
    /// First row that may contain data; row 1 is reserved for a title
    pub data_start_row: u32,
    /// Case-insensitive substring marking the end-of-data row.
    /// An empty marker disables sentinel detection.
    pub sentinel_marker: String,
    /// Substring excluding subtotal rows from header detection
    pub total_marker: String,
    /// Consecutive empty rows tolerated before the descending scan gives up.
    /// None scales the threshold to the scan's starting row.
    pub empty_row_giveup: Option<u32>,
    /// Last data row assumed when no sentinel is ever found
    pub last_row_fallback: u32,
    /// Safety margin added above a memoized last row before scanning down
    pub memo_margin: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            start_column: 3,  // "C"
            end_column: 29,   // "AC"
            data_start_row: 2,
            sentinel_marker: "adds".to_owned(),
            total_marker: "Total".to_owned(),
            empty_row_giveup: None,
            last_row_fallback: 188,
            memo_margin: 50,
        }
    }
}

impl ExtractOptions {
    /// Sets the scan range from column letters, e.g. ("C", "AC").
    pub fn set_columns(&mut self, start: &str, end: &str) -> Result<(), EngineError> {
        let start_column = column_to_index(start)
            .ok_or_else(|| EngineError::InvalidColumn(start.to_owned()))?;
        let end_column =
            column_to_index(end).ok_or_else(|| EngineError::InvalidColumn(end.to_owned()))?;
        if end_column < start_column {
            return Err(EngineError::InvalidColumn(format!("{start}..{end}")));
        }
        self.start_column = start_column;
        self.end_column = end_column;
        Ok(())
    }
}
