//! XLSX part parsers: workbook directory, shared strings, and worksheet cells.

use crate::error::StackTabError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Scalar;
use crate::spreadsheet::grid::Grid;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::ZipArchive;

// XML tag names for parsing the XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship"; // Workbook relationship entry
const TAG_SHEET: QName = QName(b"sheet"); // Worksheet definition
const TAG_SHARED_STRING_ITEM: QName = QName(b"si"); // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t"); // Text content within strings
const TAG_ROW: QName = QName(b"row"); // Row in worksheet
const TAG_CELL: QName = QName(b"c"); // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is"); // Inline string value
const TAG_VALUE: QName = QName(b"v"); // Cell value content

/// How a cell's raw value should be interpreted, from the `t` attribute.
#[derive(Copy, Clone, Debug, PartialEq)]
enum CellKind {
    /// Numeric values, the XLSX default
    Number,
    /// Inline or formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// ISO 8601 date strings, kept as text
    IsoDate,
    /// Boolean values
    Boolean,
    /// Error values, treated as absent cells
    Error,
}

/// Loads the worksheet directory from `xl/workbook.xml`.
///
/// Returns (name, zip path) pairs in workbook order, resolving each sheet's
/// relationship id against `xl/_rels/workbook.xml.rels`.
pub(super) fn load_workbook<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<Vec<(String, String)>, StackTabError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?.ok_or_else(|| {
        SpreadsheetError::MalformedGrid {
            name: "xl/workbook.xml".to_string(),
            message: "missing workbook part".to_string(),
        }
    })?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Loads worksheet relationships, mapping relationship ids to zip paths.
fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
) -> Result<HashMap<String, String>, StackTabError> {
    let mut reader =
        zip.xml_reader(path)?
            .ok_or_else(|| SpreadsheetError::MalformedGrid {
                name: path.to_string(),
                message: "missing relationships part".to_string(),
            })?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships matter here
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads the shared string table from `xl/sharedStrings.xml`.
/// Workbooks without the part yield an empty table.
pub(super) fn load_shared_strings<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<Vec<String>, StackTabError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Reads one worksheet part into a [`Grid`].
///
/// Cell coordinates come from the `r` attribute when present, falling back to
/// document order for producers that omit it. Error cells are skipped so the
/// engine sees them as absent.
pub(super) fn read_sheet<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    zip_path: &str,
    shared_strings: &[String],
) -> Result<Grid, StackTabError> {
    let mut reader =
        zip.xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::MalformedGrid {
                name: zip_path.to_string(),
                message: "missing worksheet part".to_string(),
            })?;

    let mut grid = Grid::new();
    let mut rows_done = 0u32;
    let mut cols_done = 0u32;
    let mut row = 0u32;
    let mut col = 0u32;
    let mut kind = CellKind::Number;
    let mut in_cell = false;
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == TAG_ROW => {
            rows_done += 1;
            cols_done = 0;
        }
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((rows_done + 1, cols_done + 1));
            cols_done += 1;
            kind = match event.get_attribute_value("t")?.as_deref() {
                Some("inlineStr") | Some("str") => CellKind::InlineString,
                Some("s") => CellKind::SharedString,
                Some("d") => CellKind::IsoDate,
                Some("b") => CellKind::Boolean,
                Some("e") => CellKind::Error,
                _ => CellKind::Number,
            };
            in_cell = true;
            value.clear();
        }
        Event::Start(event) if in_cell && event.name() == TAG_INLINE_STRING => {
            value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
        }
        Event::Start(event) if in_cell && event.name() == TAG_VALUE => {
            value = read_string_value(&mut reader, TAG_VALUE, true)?;
        }
        Event::End(event) if in_cell && event.name() == TAG_CELL => {
            if !value.is_empty() {
                if let Some(scalar) = to_scalar(kind, &value, shared_strings, row, col) {
                    grid.insert(row, col, scalar);
                }
            }
            in_cell = false;
        }
    });
    Ok(grid)
}

/// Interprets a raw cell value according to its kind.
/// Returns None for error cells and dangling shared string references.
fn to_scalar(
    kind: CellKind,
    value: &str,
    shared_strings: &[String],
    row: u32,
    col: u32,
) -> Option<Scalar> {
    match kind {
        CellKind::InlineString | CellKind::IsoDate => Some(Scalar::Text(value.to_owned())),
        CellKind::SharedString => {
            let index = value.parse::<usize>().ok()?;
            match shared_strings.get(index) {
                Some(string) => Some(Scalar::Text(string.to_owned())),
                None => {
                    log::warn!(
                        "Dangling shared string reference {} at {}",
                        index,
                        index_to_reference(row, col)
                    );
                    None
                }
            }
        }
        CellKind::Boolean => Some(Scalar::Boolean(value == "1")),
        CellKind::Error => {
            log::debug!("Skipping error cell at {}", index_to_reference(row, col));
            None
        }
        // Producers occasionally emit unparseable numerics; keep them as text
        CellKind::Number => Some(
            value
                .parse::<f64>()
                .map(Scalar::Number)
                .unwrap_or_else(|_| Scalar::Text(value.to_owned())),
        ),
    }
}

/// Reads string content up to `end_tag`, skipping phonetic annotations and
/// resolving entity references.
fn read_string_value<RS: Read + Seek>(
    reader: &mut XmlReader<BufReader<ZipFile<'_, RS>>>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, StackTabError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

/// Normalizes a relationship target to a path inside the zip archive.
fn to_zip_path(path: Cow<'_, str>) -> String {
    if path.starts_with("/xl/") {
        path[1..].to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
