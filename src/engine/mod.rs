//! # Stacked-Table Extraction Engine
//!
//! Turns a grid holding multiple vertically concatenated tables of unknown
//! count, length, and boundaries into a structured collection of records
//! grouped by sector and entity. The pipeline is a single synchronous pass:
//!
//! 1. [`boundary`] locates the last row of the data region;
//! 2. [`tables`] finds every header row in the bounded interval and
//!    materializes the records beneath each one;
//! 3. [`group`] folds the tables into the nested sector → entity mapping.
//!
//! The engine performs no I/O; callers fetch the workbook, read a grid, and
//! decide what to do with the result. The optional last-row [`memo`] is the
//! only state carried between runs, and only as a scan-cost hint.
pub mod boundary;
pub mod group;
pub mod memo;
pub mod options;
pub mod tables;

use crate::engine::group::OrganizedData;
use crate::engine::options::ExtractOptions;
use crate::engine::tables::Table;
use crate::spreadsheet::grid::Grid;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while configuring an extraction run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid column reference '{0}'")]
    InvalidColumn(String),
}

/// Run metadata reported next to the organized data.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Last row considered part of the data region
    pub last_row: u32,
    /// Number of detected tables
    pub tables_found: usize,
}

/// Complete result of one extraction run.
///
/// Serializes to a JSON document carrying the raw tables, the organized
/// data, and the metadata. `memo_update` is transport for the caller's memo
/// persistence and stays out of the serialized form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub raw_tables: Vec<Table>,
    pub organized_data: OrganizedData,
    pub metadata: Metadata,
    /// New last-row hint to persist, set when a sentinel row was found
    #[serde(skip)]
    pub memo_update: Option<u32>,
}

/// Runs the full pipeline over one grid.
///
/// A grid with no detectable tables is not an error: the result carries an
/// empty mapping and `tables_found` of zero, leaving the caller to decide
/// whether that is acceptable.
pub fn extract(grid: &Grid, options: &ExtractOptions, memo: Option<u32>) -> Extraction {
    let boundary = boundary::locate(grid, options, memo);
    let starts = tables::find_table_starts(grid, options, boundary.last_row);
    let raw_tables: Vec<Table> = starts
        .iter()
        .map(|start| tables::materialize(grid, options, *start, boundary.last_row))
        .collect();
    let organized_data = group::organize(&raw_tables);
    log::debug!(
        "Extracted {} tables, last data row {}",
        raw_tables.len(),
        boundary.last_row
    );

    let metadata = Metadata {
        last_row: boundary.last_row,
        tables_found: raw_tables.len(),
    };
    Extraction {
        raw_tables,
        organized_data,
        metadata,
        memo_update: boundary.memo_update,
    }
}
