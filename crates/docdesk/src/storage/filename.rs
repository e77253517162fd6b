//! Filename sanitization and the upload extension allow-list

use crate::error::{Error, Result};
use crate::types::DocumentType;

/// Reduce an uploaded filename to a safe flat name.
///
/// Any directory component is dropped, whitespace runs become `_`, only Unicode alphanumerics
/// and `.`, `_`, `-` survive, and leading/trailing dots and underscores are trimmed.
/// Returns `None` when nothing usable is left.
pub fn secure_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);

    let mut cleaned = String::with_capacity(base.len());
    let mut pending_space = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(ch.is_alphanumeric() || matches!(ch, '.' | '_' | '-')) {
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push('_');
        }
        pending_space = false;
        cleaned.push(ch);
    }

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Allow-list of extensions accepted by `write_document`
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Accept every extension
    pub fn permissive() -> Self {
        Self {
            allowed_extensions: Vec::new(),
        }
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        match filename.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }

    /// Sanitize an incoming filename and check it against the allow-list
    pub fn admit(&self, raw: &str) -> Result<String> {
        let filename =
            secure_filename(raw).ok_or_else(|| Error::InvalidFilename(raw.to_string()))?;
        if !self.is_allowed(&filename) {
            return Err(Error::UnsupportedFileType(format!(
                "{} ({})",
                filename,
                DocumentType::from_filename(&filename).display_name()
            )));
        }
        Ok(filename)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Reject lookups that could escape a flat storage directory
pub(crate) fn validate_lookup_name(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
    {
        return Err(Error::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
