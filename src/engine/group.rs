//! Grouping Reducer: folds the ordered table sequence into the nested
//! sector → entity → records mapping handed to callers.

use crate::engine::tables::Record;
use crate::engine::tables::Table;
use indexmap::IndexMap;

/// Nested mapping: sector name → entity name → records, all in insertion
/// (table scan) order.
pub type OrganizedData = IndexMap<String, IndexMap<String, Vec<Record>>>;

/// Entity name candidates, checked in priority order.
const ENTITY_FIELDS: [&str; 4] = ["Company", "Name", "Company/Asset", "Coin"];

/// Folds all tables into organized data.
///
/// Sector + entity is the effective grouping key: the same entity appearing
/// on several rows of one table accumulates multiple entries in its bucket,
/// deliberately without deduplication.
pub fn organize(tables: &[Table]) -> OrganizedData {
    let mut organized = OrganizedData::new();
    for (index, table) in tables.iter().enumerate() {
        for record in &table.records {
            let sector = sector_name(record, index);
            let entity = entity_name(record, index);
            organized
                .entry(sector)
                .or_default()
                .entry(entity)
                .or_default()
                .push(record.to_owned());
        }
    }
    organized
}

/// "Coin" when the record carries a string-valued "Coin" field, else the
/// positional "Section {index+1}" name.
fn sector_name(record: &Record, index: usize) -> String {
    match record.get("Coin").and_then(|value| value.as_text()) {
        Some(_) => "Coin".to_owned(),
        None => format!("Section {}", index + 1),
    }
}

/// First populated entity field in priority order, else a synthetic
/// "Entry {index}" name.
fn entity_name(record: &Record, index: usize) -> String {
    ENTITY_FIELDS
        .iter()
        .find_map(|field| record.get(*field))
        .map(|value| value.to_string())
        .unwrap_or_else(|| format!("Entry {index}"))
}
