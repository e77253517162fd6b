//! CSV and spreadsheet readers
//!
//! The grid readers here are shared by search (flattened to text) and by the merge loader
//! (kept as rows).

use std::io::Cursor;

use calamine::Reader;

use crate::error::{Error, Result};

use super::TextExtractor;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strip a leading UTF-8 byte order mark
pub fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of failing
pub fn decode_lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(strip_bom(data))
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Read delimited text into rows; ragged rows are allowed
pub fn read_csv_rows(text: &str) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read every worksheet of an xlsx/xls workbook as `(sheet name, rows)`
pub fn read_workbook(data: &[u8]) -> std::result::Result<Vec<(String, Vec<Vec<String>>)>, String> {
    let cursor = Cursor::new(data);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor).map_err(|e| e.to_string())?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => {
                let rows = range
                    .rows()
                    .map(|row| row.iter().map(cell_to_string).collect())
                    .collect();
                sheets.push((sheet_name, rows));
            }
            Err(e) => {
                tracing::debug!("Skipping unreadable sheet '{}': {}", sheet_name, e);
            }
        }
    }
    Ok(sheets)
}

/// Render one spreadsheet cell as text
pub fn cell_to_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Cells are tab separated and rows newline terminated, so no keyword matches a separator alone
fn render_rows(rows: &[Vec<String>], out: &mut String) {
    for row in rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
}

/// Delimited text extractor
pub struct CsvExtractor;

impl TextExtractor for CsvExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let text = decode_lossy(data);
        let rows =
            read_csv_rows(&text).map_err(|e| Error::file_parse("document.csv", e.to_string()))?;

        let mut content = String::new();
        render_rows(&rows, &mut content);
        Ok(content)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Excel workbook extractor, all sheets
pub struct SpreadsheetExtractor;

impl TextExtractor for SpreadsheetExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let sheets =
            read_workbook(data).map_err(|e| Error::file_parse("spreadsheet.xlsx", e))?;

        let mut content = String::new();
        for (sheet_name, rows) in &sheets {
            content.push_str(sheet_name);
            content.push('\n');
            render_rows(rows, &mut content);
            content.push('\n');
        }
        Ok(content)
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }
}
