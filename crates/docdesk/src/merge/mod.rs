//! Named-key spreadsheet merge
//!
//! A base document holds one record in key/value layout (`이름, 홍길동` / `나이, 30`). A
//! candidate document is an ordinary header-and-rows table keyed by its first column. The merge
//! appends every candidate row whose key the base does not already have, restricted to the
//! base's columns. The base wins on key collisions, and candidate-only columns are dropped.

mod engine;
pub mod export;
mod loader;
mod table;

pub use engine::{merge_tables, MergeEngine};
pub use loader::load_grid;
pub use table::{Row, Table};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output format of the merge artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeFormat {
    /// Single-sheet Excel workbook
    #[default]
    Xlsx,
    /// UTF-8 CSV with a byte order mark
    Csv,
}

impl MergeFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for MergeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(Error::UnsupportedFileType(format!(
                "merge output format '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MergeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_extension())
    }
}
