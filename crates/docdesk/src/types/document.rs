//! Document type tags and stored-document metadata

use serde::{Deserialize, Serialize};

/// Document type tag derived once from the stored filename's extension
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Comma separated values
    Csv,
    /// Excel spreadsheet (.xlsx)
    Xlsx,
    /// Old Excel spreadsheet (.xls), read through the same spreadsheet reader
    Xls,
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Hangul word processor file: accepted for upload, never extracted
    Hwp,
    /// Anything else
    Unsupported,
}

impl DocumentType {
    /// Detect the type from a filename (text after the last `.`, case-insensitive)
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unsupported,
        }
    }

    /// Detect the type from a bare extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            "xls" => Self::Xls,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "hwp" => Self::Hwp,
            _ => Self::Unsupported,
        }
    }

    /// Whether the merge engine can load this type as a table
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Xlsx | Self::Xls)
    }

    /// Whether text extraction is implemented for this type
    pub fn is_extractable(&self) -> bool {
        !matches!(self, Self::Hwp | Self::Unsupported)
    }

    /// MIME type used when serving the raw document
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Hwp => "application/x-hwp",
            Self::Unsupported => "application/octet-stream",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel Spreadsheet (.xlsx)",
            Self::Xls => "Excel Spreadsheet (.xls)",
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Hwp => "Hangul Document (.hwp)",
            Self::Unsupported => "Unsupported",
        }
    }
}

/// Metadata about a stored document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Stored filename, unique within the storage directory
    pub filename: String,
    /// Type tag derived from the extension
    pub file_type: DocumentType,
    /// Size in bytes
    pub size: u64,
}

impl DocumentInfo {
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        let filename = filename.into();
        Self {
            file_type: DocumentType::from_filename(&filename),
            filename,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_filename() {
        assert_eq!(DocumentType::from_filename("report_2023.csv"), DocumentType::Csv);
        assert_eq!(DocumentType::from_filename("Sales.XLSX"), DocumentType::Xlsx);
        assert_eq!(DocumentType::from_filename("archive.tar.pdf"), DocumentType::Pdf);
        assert_eq!(DocumentType::from_filename("memo.docx"), DocumentType::Docx);
        assert_eq!(DocumentType::from_filename("공문.hwp"), DocumentType::Hwp);
        assert_eq!(DocumentType::from_filename("notes.txt"), DocumentType::Unsupported);
        assert_eq!(DocumentType::from_filename("README"), DocumentType::Unsupported);
    }

    #[test]
    fn test_tabular_and_extractable() {
        assert!(DocumentType::Csv.is_tabular());
        assert!(DocumentType::Xls.is_tabular());
        assert!(!DocumentType::Pdf.is_tabular());
        assert!(DocumentType::Pdf.is_extractable());
        assert!(!DocumentType::Hwp.is_extractable());
        assert!(!DocumentType::Unsupported.is_extractable());
    }

    #[test]
    fn test_document_info_derives_type() {
        let info = DocumentInfo::new("budget.xlsx", 2048);
        assert_eq!(info.file_type, DocumentType::Xlsx);
        assert_eq!(info.size, 2048);
    }
}
