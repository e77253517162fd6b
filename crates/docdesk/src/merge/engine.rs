//! Merge policy and the storage-backed merge engine

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::storage::DocumentStore;
use crate::types::DocumentType;

use super::loader::load_grid;
use super::{Row, Table};

/// Append candidate rows whose key is new to `base`, restricted to base's columns.
///
/// The result keeps the base's key column name and column order. Base rows come first and are
/// unchanged. A new row takes the candidate's value for every attribute the two tables share and
/// an empty string for base attributes the candidate lacks; candidate-only attributes are
/// dropped. The candidate's key column is matched positionally, whatever its header says.
pub fn merge_tables(base: &Table, candidate: &Table) -> Table {
    let existing: HashSet<&str> = base.rows.iter().map(|r| r.key.as_str()).collect();

    // base column position -> candidate column position
    let mapping: Vec<Option<usize>> = base
        .columns
        .iter()
        .map(|column| candidate.column_index(column))
        .collect();

    let new_rows = candidate
        .rows
        .iter()
        .filter(|row| !existing.contains(row.key.as_str()))
        .map(|row| {
            let values = mapping
                .iter()
                .map(|source| {
                    source
                        .and_then(|i| row.values.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            Row::new(row.key.clone(), values)
        });

    let mut rows = base.rows.clone();
    rows.extend(new_rows);

    Table::new(base.key_column.clone(), base.columns.clone(), rows)
}

/// Loads two stored documents and merges them
pub struct MergeEngine {
    store: Arc<dyn DocumentStore>,
}

impl MergeEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Merge the stored `candidate_name` table into the stored `base_name` record.
    ///
    /// Fails with `DocumentNotFound` if either document is absent, and with `MalformedInput` if
    /// either is not a tabular document of the expected layout.
    pub fn merge(&self, base_name: &str, candidate_name: &str) -> Result<Table> {
        let base_bytes = self.read_input(base_name)?;
        let candidate_bytes = self.read_input(candidate_name)?;

        let base = Table::from_key_value_grid(base_name, &self.load(base_name, &base_bytes)?)?;
        let candidate = Table::from_header_grid(
            candidate_name,
            &self.load(candidate_name, &candidate_bytes)?,
        )?;

        if candidate.key_column != base.key_column {
            tracing::debug!(
                "Key column names differ ('{}' vs '{}'); matching candidate keys by position",
                base.key_column,
                candidate.key_column
            );
        }

        let merged = merge_tables(&base, &candidate);
        tracing::info!(
            "Merged '{}' into '{}': {} candidate rows, {} added, {} columns kept",
            candidate_name,
            base_name,
            candidate.rows.len(),
            merged.rows.len() - base.rows.len(),
            merged.columns.len() + 1
        );

        Ok(merged)
    }

    /// A name the store cannot even look up resolves to no document
    fn read_input(&self, filename: &str) -> Result<Vec<u8>> {
        self.store.read_document(filename).map_err(|e| match e {
            Error::InvalidFilename(name) => Error::DocumentNotFound(name),
            other => other,
        })
    }

    fn load(&self, filename: &str, data: &[u8]) -> Result<Vec<Vec<String>>> {
        let doc_type = DocumentType::from_filename(filename);
        if !doc_type.is_tabular() {
            return Err(Error::malformed(
                filename,
                format!("{} cannot be merged", doc_type.display_name()),
            ));
        }
        load_grid(filename, doc_type, data)
    }
}
