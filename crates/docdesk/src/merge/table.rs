//! Keyed tabular model and the two input layouts

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One keyed row; `values` is aligned with the owning table's `columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    pub values: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

/// Named columns plus rows addressed by a key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Name of the key column, always rendered first
    pub key_column: String,
    /// Attribute column names, excluding the key column
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(key_column: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            key_column: key_column.into(),
            columns,
            rows,
        }
    }

    /// Header row: key column first, then attributes
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(self.key_column.as_str())
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Position of an attribute column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Row with the given key
    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Cell value by key and attribute column name
    pub fn value(&self, key: &str, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.row(key)
            .and_then(|r| r.values.get(index))
            .map(String::as_str)
    }

    /// Header plus data rows, every row padded to the header width
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let width = self.columns.len();
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.header().into_iter().map(str::to_string).collect());
        for row in &self.rows {
            let mut line = Vec::with_capacity(width + 1);
            line.push(row.key.clone());
            for i in 0..width {
                line.push(row.values.get(i).cloned().unwrap_or_default());
            }
            grid.push(line);
        }
        grid
    }

    /// Build the single-record base from a key/value layout.
    ///
    /// The first row is `[key column name, key value]`; every further row is
    /// `[attribute name, attribute value]`. Attribute order follows the rows.
    pub fn from_key_value_grid(filename: &str, grid: &[Vec<String>]) -> Result<Self> {
        let (first, rest) = grid
            .split_first()
            .ok_or_else(|| Error::malformed(filename, "no rows"))?;

        let (key_column, key) = label_value(filename, first, 1)?;
        if key.is_empty() {
            return Err(Error::malformed(
                filename,
                format!("row 1: key column '{}' has no value", key_column),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(key_column);

        let mut columns = Vec::with_capacity(rest.len());
        let mut values = Vec::with_capacity(rest.len());
        for (i, line) in rest.iter().enumerate() {
            let (label, value) = label_value(filename, line, i + 2)?;
            if !seen.insert(label) {
                return Err(Error::malformed(
                    filename,
                    format!("row {}: duplicate attribute '{}'", i + 2, label),
                ));
            }
            columns.push(label.to_string());
            values.push(value.to_string());
        }

        Ok(Self::new(key_column, columns, vec![Row::new(key, values)]))
    }

    /// Build a row-keyed table from a header layout.
    ///
    /// The first row is the header; its first cell names the key column. Each further row is
    /// keyed by its first cell. Keys must be non-empty and unique.
    pub fn from_header_grid(filename: &str, grid: &[Vec<String>]) -> Result<Self> {
        let (header, body) = grid
            .split_first()
            .ok_or_else(|| Error::malformed(filename, "no header row"))?;

        let width = header
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |last| last + 1);
        let header = &header[..width];

        let key_column = match header.first() {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                return Err(Error::malformed(
                    filename,
                    "header row has no key column name",
                ))
            }
        };

        let mut seen: HashSet<&str> = HashSet::new();
        for name in header.iter().filter(|name| !name.is_empty()) {
            if !seen.insert(name.as_str()) {
                return Err(Error::malformed(
                    filename,
                    format!("duplicate column '{}'", name),
                ));
            }
        }
        let columns: Vec<String> = header[1..].to_vec();

        let mut keys: HashSet<&str> = HashSet::new();
        let mut rows = Vec::with_capacity(body.len());
        for (i, line) in body.iter().enumerate() {
            let line_number = i + 2;
            let key = line.first().map(String::as_str).unwrap_or_default();
            if key.is_empty() {
                return Err(Error::malformed(
                    filename,
                    format!("row {}: empty '{}'", line_number, key_column),
                ));
            }
            if !keys.insert(key) {
                return Err(Error::malformed(
                    filename,
                    format!("row {}: duplicate key '{}'", line_number, key),
                ));
            }

            let values = (1..width)
                .map(|c| line.get(c).cloned().unwrap_or_default())
                .collect();
            rows.push(Row::new(key, values));
        }

        Ok(Self::new(key_column, columns, rows))
    }
}

/// Split a key/value line into `(label, value)`; only the first `value` cell may be filled
fn label_value<'a>(filename: &str, line: &'a [String], line_number: usize) -> Result<(&'a str, &'a str)> {
    let label = line.first().map(String::as_str).unwrap_or_default();
    if label.is_empty() {
        return Err(Error::malformed(
            filename,
            format!("row {}: empty label", line_number),
        ));
    }
    if line.iter().skip(2).any(|cell| !cell.is_empty()) {
        return Err(Error::malformed(
            filename,
            format!(
                "row {}: '{}' has more than one value",
                line_number, label
            ),
        ));
    }
    let value = line.get(1).map(String::as_str).unwrap_or_default();
    Ok((label, value))
}
