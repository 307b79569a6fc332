//! # stacktab
//!
//! Extracts vertically stacked spreadsheet tables into grouped, queryable
//! records. Exported sheets of this shape concatenate an unknown number of
//! tables down one column range, with no declared boundaries; this crate
//! finds where each table starts and ends, infers its header, materializes
//! its rows, and regroups everything into a sector → entity → records
//! mapping ready for JSON serialization.
//!
//! ## Usage
//!
//! ```no_run
//! use stacktab::{extract, ExtractOptions, Workbook};
//!
//! # fn main() -> Result<(), stacktab::StackTabError> {
//! let mut workbook = Workbook::open("portfolio.xlsx")?;
//! let grid = workbook.read_grid(None)?;
//! let extraction = extract(&grid, &ExtractOptions::default(), None);
//! println!("{}", serde_json::to_string(&extraction.organized_data).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! The engine itself performs no I/O: [`Workbook`] turns an XLSX export into
//! a [`Grid`], and [`extract`] runs the boundary → segmentation →
//! materialization → grouping pipeline over it. The optional last-row memo
//! ([`engine::memo`]) only narrows the boundary search window on repeated
//! runs against the same sheet layout.
pub mod engine;
mod error;
mod helpers;
pub mod spreadsheet;

pub use crate::engine::extract;
pub use crate::engine::group::OrganizedData;
pub use crate::engine::options::ExtractOptions;
pub use crate::engine::tables::{Record, Table};
pub use crate::engine::{Extraction, Metadata};
pub use crate::error::StackTabError;
pub use crate::spreadsheet::cell::Scalar;
pub use crate::spreadsheet::grid::Grid;
pub use crate::spreadsheet::{SpreadsheetError, Workbook};
