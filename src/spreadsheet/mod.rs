//! # Spreadsheet Access Module
//!
//! Opens an exported workbook (XLSX container: ZIP + XML) from a local path,
//! a byte buffer, or any seekable reader, and materializes one worksheet as a
//! [`Grid`]: a sparse, read-only mapping from (row, column) to scalar values.
//! The extraction engine never touches the container format; it only sees the
//! grid.
pub mod cell;
pub mod grid;
pub mod reference;
mod xlsx;

use crate::error::ResultMessage;
use crate::error::StackTabError;
use crate::spreadsheet::grid::Grid;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use thiserror::Error;

/// Errors raised while opening a workbook or materializing a grid.
///
/// `SourceUnavailable` and `MalformedGrid` are deliberately separate kinds:
/// callers must be able to tell "the resource never opened" apart from "the
/// resource opened but is not a parseable workbook", and neither is ever
/// conflated with a legitimately empty sheet.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// The resource could not be opened at all; retry policy belongs to the caller.
    #[error("Cannot open spreadsheet '{name}': {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource opened but does not contain a parseable workbook.
    #[error("'{name}' is not a readable workbook: {message}")]
    MalformedGrid { name: String, message: String },

    /// The workbook parsed but declares no worksheets.
    #[error("Workbook '{name}' declares no worksheets")]
    EmptyWorkbook { name: String },

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet '{sheet}' not found in '{name}'")]
    SheetNotFound { name: String, sheet: String },
}

/// An opened XLSX workbook with its worksheet directory resolved.
#[derive(Debug)]
pub struct Workbook<RS: Read + Seek> {
    /// Source identifier, used in error context
    name: String,
    /// ZIP archive containing the workbook parts
    zip: zip::ZipArchive<RS>,
    /// Worksheets as (name, zip path) pairs, in workbook order
    sheets: Vec<(String, String)>,
    /// Shared string table, loaded on first grid read
    shared_strings: Option<Vec<String>>,
}

impl Workbook<BufReader<File>> {
    /// Opens a workbook from a local file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StackTabError> {
        let name = path.as_ref().to_string_lossy().to_string();
        let file = File::open(&path).map_err(|source| SpreadsheetError::SourceUnavailable {
            name: name.to_owned(),
            source,
        })?;
        Self::from_reader(&name, BufReader::new(file))
    }
}

impl Workbook<Cursor<Vec<u8>>> {
    /// Opens a workbook from an in-memory byte buffer, e.g. a downloaded export.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self, StackTabError> {
        Self::from_reader(name, Cursor::new(bytes))
    }
}

impl<RS: Read + Seek> Workbook<RS> {
    /// Opens a workbook from any seekable reader.
    pub fn from_reader(name: &str, reader: RS) -> Result<Self, StackTabError> {
        let mut zip =
            zip::ZipArchive::new(reader).map_err(|error| SpreadsheetError::MalformedGrid {
                name: name.to_owned(),
                message: error.to_string(),
            })?;
        let sheets = xlsx::load_workbook(&mut zip).map_err(|error| {
            StackTabError::from(SpreadsheetError::MalformedGrid {
                name: name.to_owned(),
                message: error.to_string(),
            })
        })?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook {
                name: name.to_owned(),
            })?;
        }
        Ok(Workbook {
            name: name.to_owned(),
            zip,
            sheets,
            shared_strings: None,
        })
    }

    /// Source identifier this workbook was opened from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Materializes a worksheet as a grid.
    /// With `sheet_name` as None the first worksheet is read, matching the
    /// common single-sheet export layout.
    pub fn read_grid(&mut self, sheet_name: Option<&str>) -> Result<Grid, StackTabError> {
        let (_, zip_path) = match sheet_name {
            Some(requested) => self
                .sheets
                .iter()
                .find(|(name, _)| name == requested)
                .ok_or_else(|| SpreadsheetError::SheetNotFound {
                    name: self.name.to_owned(),
                    sheet: requested.to_owned(),
                })?,
            None => &self.sheets[0],
        };
        let zip_path = zip_path.to_owned();

        if self.shared_strings.is_none() {
            let strings = xlsx::load_shared_strings(&mut self.zip).with_prefix(&self.name)?;
            self.shared_strings = Some(strings);
        }
        let shared_strings = self.shared_strings.as_deref().unwrap_or(&[]);
        xlsx::read_sheet(&mut self.zip, &zip_path, shared_strings).with_prefix(&self.name)
    }
}
