//! Merge artifact writers
//!
//! `to_xlsx` writes a minimal single-sheet SpreadsheetML package: shared strings for every
//! non-empty cell, header row first, key column first.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

use super::{MergeFormat, Table};

const MAX_SHEET_NAME_LEN: usize = 31;
const DEFAULT_SHEET_NAME: &str = "Sheet1";

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_RELS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const SHARED_STRINGS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

const DEFAULT_CONTENT_TYPES: [(&str, &str); 2] = [
    (
        "rels",
        "application/vnd.openxmlformats-package.relationships+xml",
    ),
    ("xml", "application/xml"),
];

const PART_CONTENT_TYPES: [(&str, &str); 3] = [
    (
        "/xl/workbook.xml",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
    ),
    (
        "/xl/worksheets/sheet1.xml",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
    ),
    (
        "/xl/sharedStrings.xml",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml",
    ),
];

type XmlWriter = Writer<Vec<u8>>;

/// Render a table in the requested format
pub fn render(table: &Table, format: MergeFormat, sheet_name: &str) -> Result<Vec<u8>> {
    match format {
        MergeFormat::Xlsx => to_xlsx(table, sheet_name),
        MergeFormat::Csv => to_csv(table),
    }
}

/// Write a single-sheet xlsx workbook
pub fn to_xlsx(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let grid = table.to_grid();
    let mut strings = SharedStrings::default();

    // the sheet interns its cells, so it is written before the string table
    let sheet = worksheet(&grid, &mut strings)?;
    let parts = [
        ("[Content_Types].xml", content_types()?),
        (
            "_rels/.rels",
            relationships(&[(OFFICE_DOCUMENT_REL, "xl/workbook.xml")])?,
        ),
        ("xl/workbook.xml", workbook(sheet_name)?),
        (
            "xl/_rels/workbook.xml.rels",
            relationships(&[
                (WORKSHEET_REL, "worksheets/sheet1.xml"),
                (SHARED_STRINGS_REL, "sharedStrings.xml"),
            ])?,
        ),
        ("xl/worksheets/sheet1.xml", sheet),
        ("xl/sharedStrings.xml", strings.to_xml()?),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, body) in &parts {
        zip.start_file(*path, options)?;
        zip.write_all(body)?;
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(
        "Wrote xlsx: {} rows, {} columns, {} bytes",
        grid.len(),
        grid.first().map_or(0, Vec::len),
        bytes.len()
    );
    Ok(bytes)
}

/// One XML part: declaration plus a root element whose children `body` writes
fn xml_part<F>(root: &str, attributes: &[(&str, &str)], body: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut XmlWriter) -> std::io::Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer
        .create_element(root)
        .with_attributes(attributes.iter().copied())
        .write_inner_content(body)?;
    Ok(writer.into_inner())
}

fn content_types() -> Result<Vec<u8>> {
    xml_part("Types", &[("xmlns", CONTENT_TYPES_NS)], |w| {
        for (extension, content_type) in DEFAULT_CONTENT_TYPES {
            w.create_element("Default")
                .with_attributes([("Extension", extension), ("ContentType", content_type)])
                .write_empty()?;
        }
        for (part, content_type) in PART_CONTENT_TYPES {
            w.create_element("Override")
                .with_attributes([("PartName", part), ("ContentType", content_type)])
                .write_empty()?;
        }
        Ok(())
    })
}

/// Relationship part with ids `rId1..` in the order given
fn relationships(targets: &[(&str, &str)]) -> Result<Vec<u8>> {
    xml_part("Relationships", &[("xmlns", PACKAGE_RELS_NS)], |w| {
        for (i, (rel_type, target)) in targets.iter().enumerate() {
            let id = format!("rId{}", i + 1);
            w.create_element("Relationship")
                .with_attributes([("Id", id.as_str()), ("Type", *rel_type), ("Target", *target)])
                .write_empty()?;
        }
        Ok(())
    })
}

fn workbook(sheet_name: &str) -> Result<Vec<u8>> {
    let name = sanitize_sheet_name(sheet_name);
    xml_part(
        "workbook",
        &[("xmlns", SPREADSHEET_NS), ("xmlns:r", OFFICE_RELS_NS)],
        |w| {
            w.create_element("sheets").write_inner_content(|w| {
                w.create_element("sheet")
                    .with_attributes([("name", name.as_str()), ("sheetId", "1"), ("r:id", "rId1")])
                    .write_empty()?;
                Ok(())
            })?;
            Ok(())
        },
    )
}

fn worksheet(grid: &[Vec<String>], strings: &mut SharedStrings) -> Result<Vec<u8>> {
    let width = grid.first().map_or(0, Vec::len);

    xml_part("worksheet", &[("xmlns", SPREADSHEET_NS)], |w| {
        if width > 0 {
            let range = format!("A1:{}{}", column_letters(width - 1), grid.len());
            w.create_element("dimension")
                .with_attribute(("ref", range.as_str()))
                .write_empty()?;
        }

        w.create_element("sheetData").write_inner_content(|w| {
            for (r, row) in grid.iter().enumerate() {
                let row_number = r + 1;
                w.create_element("row")
                    .with_attribute(("r", row_number.to_string().as_str()))
                    .write_inner_content(|w| {
                        for (c, cell) in row.iter().enumerate() {
                            // empty cells are omitted rather than written blank
                            if cell.is_empty() {
                                continue;
                            }
                            let reference = format!("{}{}", column_letters(c), row_number);
                            let index = strings.intern(cell).to_string();
                            w.create_element("c")
                                .with_attributes([("r", reference.as_str()), ("t", "s")])
                                .write_inner_content(|w| {
                                    w.create_element("v")
                                        .write_text_content(BytesText::new(&index))?;
                                    Ok(())
                                })?;
                        }
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
        Ok(())
    })
}

/// Write UTF-8 CSV with a byte order mark so spreadsheet software detects the encoding
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(b"\xEF\xBB\xBF".to_vec());
    for row in table.to_grid() {
        writer
            .write_record(&row)
            .map_err(|e| Error::export(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::export(e.to_string()))
}

#[derive(Default)]
struct SharedStrings {
    order: Vec<String>,
    index: HashMap<String, usize>,
    count: usize,
}

impl SharedStrings {
    fn intern(&mut self, value: &str) -> usize {
        self.count += 1;
        if let Some(&i) = self.index.get(value) {
            return i;
        }
        let i = self.order.len();
        self.order.push(value.to_string());
        self.index.insert(value.to_string(), i);
        i
    }

    fn to_xml(&self) -> Result<Vec<u8>> {
        let count = self.count.to_string();
        let unique = self.order.len().to_string();
        let attributes = [
            ("xmlns", SPREADSHEET_NS),
            ("count", count.as_str()),
            ("uniqueCount", unique.as_str()),
        ];

        xml_part("sst", &attributes, |w| {
            for value in &self.order {
                let text = strip_invalid_xml_chars(value);
                w.create_element("si").write_inner_content(|w| {
                    w.create_element("t")
                        .with_attribute(("xml:space", "preserve"))
                        .write_text_content(BytesText::new(&text))?;
                    Ok(())
                })?;
            }
            Ok(())
        })
    }
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA)
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Remove characters XML 1.0 cannot carry
fn strip_invalid_xml_chars(value: &str) -> String {
    value
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = strip_invalid_xml_chars(name)
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}
