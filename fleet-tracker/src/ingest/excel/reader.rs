//! Decode the trip workbook into raw rows
//!
//! Only the first sheet is read. Row 1 holds the headers; every later row
//! becomes a [`RawRow`] keyed by those headers.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::ingest::{CellValue, RawRow};

/// Error decoding a workbook
#[derive(Debug)]
pub enum WorkbookError {
    /// Bytes are not a readable xlsx/xls/ods workbook
    Open(calamine::Error),
    /// The workbook has no sheets
    NoSheets,
    /// The first sheet could not be read
    Sheet {
        name: String,
        source: calamine::Error,
    },
    /// The first sheet has no header row
    MissingHeader { sheet: String },
}

impl std::fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkbookError::Open(e) => write!(f, "Failed to open workbook: {}", e),
            WorkbookError::NoSheets => write!(f, "Workbook has no sheets"),
            WorkbookError::Sheet { name, source } => {
                write!(f, "Failed to read sheet '{}': {}", name, source)
            }
            WorkbookError::MissingHeader { sheet } => {
                write!(f, "Sheet '{}' has no header row", sheet)
            }
        }
    }
}

impl std::error::Error for WorkbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkbookError::Open(e) => Some(e),
            WorkbookError::Sheet { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decoded first sheet
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Decode workbook bytes into the rows of its first sheet
pub fn decode_workbook(bytes: Vec<u8>) -> Result<DecodedSheet, WorkbookError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(WorkbookError::Open)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(WorkbookError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| WorkbookError::Sheet {
            name: sheet_name.clone(),
            source,
        })?;

    let sheet = sheet_from_range(&sheet_name, &range)?;

    log::info!(
        "Decoded sheet '{}': {} columns, {} rows",
        sheet.name,
        sheet.headers.len(),
        sheet.rows.len()
    );
    if let Some(first) = sheet.rows.first() {
        log::debug!("First row of '{}': {:?}", sheet.name, first);
    }

    Ok(sheet)
}

/// Map a sheet range to rows, using the first row as headers.
///
/// Each row keeps its 1-based sheet row number, so dropped blank rows and a
/// range that starts below row 1 do not shift diagnostics.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Result<DecodedSheet, WorkbookError> {
    // calamine rows are 0-based and the range may not start at the top
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let header_row = rows.next().ok_or_else(|| WorkbookError::MissingHeader {
        sheet: name.to_string(),
    })?;
    let headers = unique_headers(header_row);

    if headers.iter().all(String::is_empty) {
        return Err(WorkbookError::MissingHeader {
            sheet: name.to_string(),
        });
    }

    let mut decoded = Vec::new();
    for (offset, row) in rows.enumerate() {
        let raw: RawRow = row
            .iter()
            .enumerate()
            .filter_map(|(col_idx, cell)| {
                let header = headers.get(col_idx)?;
                // Skip columns without a header
                if header.is_empty() {
                    return None;
                }
                Some((header.clone(), CellValue::from(cell)))
            })
            .collect();

        // Skip empty rows
        if raw.is_blank() {
            continue;
        }
        decoded.push(raw.at_line(first_line + offset + 1));
    }

    Ok(DecodedSheet {
        name: name.to_string(),
        headers,
        rows: decoded,
    })
}

/// Header names with repeats suffixed `_1`, `_2`, ... so no column is shadowed
fn unique_headers(header_row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header_row
        .iter()
        .map(|cell| {
            let name = CellValue::from(cell).to_trimmed_string();
            if name.is_empty() {
                return name;
            }
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}_{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}
