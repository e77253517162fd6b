//! Load stored bytes as a trimmed cell grid

use crate::error::{Error, Result};
use crate::extraction::tabular::{read_csv_rows, read_workbook, strip_bom};
use crate::types::DocumentType;

/// Read a tabular document into rows of trimmed cells.
///
/// CSV must be valid UTF-8 (a BOM is allowed); spreadsheets contribute their first worksheet.
/// Rows whose cells are all empty are dropped.
pub fn load_grid(filename: &str, doc_type: DocumentType, data: &[u8]) -> Result<Vec<Vec<String>>> {
    let rows = match doc_type {
        DocumentType::Csv => {
            let text = std::str::from_utf8(strip_bom(data))
                .map_err(|e| Error::malformed(filename, format!("not valid UTF-8: {}", e)))?;
            read_csv_rows(text).map_err(|e| Error::malformed(filename, e.to_string()))?
        }
        DocumentType::Xlsx | DocumentType::Xls => {
            let sheets = read_workbook(data).map_err(|e| Error::malformed(filename, e))?;
            let (sheet_name, rows) = sheets
                .into_iter()
                .next()
                .ok_or_else(|| Error::malformed(filename, "workbook has no readable worksheet"))?;
            tracing::debug!("Loaded sheet '{}' from '{}'", sheet_name, filename);
            rows
        }
        other => {
            return Err(Error::malformed(
                filename,
                format!("{} is not a tabular format", other.display_name()),
            ))
        }
    };

    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect())
}
