//! Last-row memo persistence.
//!
//! The memo remembers the previously detected end-of-data row so the next
//! run can start its descending scan from a narrow window. It is a hint, not
//! a source of truth: a missing, unreadable, or stale memo only changes scan
//! cost, never the extraction result. Writes go through a sibling temp file
//! and a rename so concurrent readers never observe a partial value.

use crate::error::StackTabError;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
struct Memo {
    row: u32,
}

/// Reads the persisted last-row hint. Any failure degrades to None.
pub fn load(path: &Path) -> Option<u32> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Ignoring unreadable memo {}: {error}", path.display());
            }
            return None;
        }
    };
    match serde_json::from_str::<Memo>(&text) {
        Ok(memo) => Some(memo.row),
        Err(error) => {
            log::warn!("Ignoring malformed memo {}: {error}", path.display());
            None
        }
    }
}

/// Persists the hint atomically (write-temp-then-rename).
pub fn store(path: &Path, row: u32) -> Result<(), StackTabError> {
    let text = serde_json::to_string(&Memo { row })?;
    let temp = path.with_extension("tmp");
    fs::write(&temp, text)?;
    fs::rename(&temp, path)?;
    Ok(())
}
