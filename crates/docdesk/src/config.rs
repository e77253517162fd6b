//! Configuration for the document desk

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::merge::MergeFormat;

/// Environment variable naming a TOML config file
pub const CONFIG_ENV: &str = "DOCDESK_CONFIG";

/// Environment variable overriding the upload directory
pub const UPLOAD_DIR_ENV: &str = "DOCDESK_UPLOAD_DIR";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Document storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Merge output configuration
    #[serde(default)]
    pub merge: MergeConfig,
}

impl DeskConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// Sections missing from the file fall back to their defaults. `DOCDESK_UPLOAD_DIR`
    /// overrides `storage.upload_dir` either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config: DeskConfig = toml::from_str(&raw)?;
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            None => DeskConfig::default(),
        };

        if let Ok(dir) = std::env::var(UPLOAD_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.storage.upload_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Load configuration from the file named by `DOCDESK_CONFIG`, if set
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).ok().filter(|p| !p.trim().is_empty());
        Self::load(path.as_deref().map(Path::new))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Document storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Flat directory holding every uploaded document
    pub upload_dir: PathBuf,
    /// Extensions accepted on upload (lowercase, without the dot)
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("static").join("uploads"),
            allowed_extensions: ["xlsx", "xls", "csv", "pdf", "docx", "hwp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Merge output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Format used when a merge request does not name one
    pub default_format: MergeFormat,
    /// Worksheet name of the exported workbook
    pub sheet_name: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            default_format: MergeFormat::Xlsx,
            sheet_name: "merged".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_upload_policy() {
        let config = DeskConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.upload_dir, PathBuf::from("static/uploads"));
        assert!(config.storage.allowed_extensions.contains(&"hwp".to_string()));
        assert_eq!(config.merge.default_format, MergeFormat::Xlsx);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8088
            enable_cors = false
            max_upload_size = 1024

            [merge]
            default_format = "csv"
            sheet_name = "result"
        "#;
        let config: DeskConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 8088);
        assert!(!config.server.enable_cors);
        assert_eq!(config.merge.default_format, MergeFormat::Csv);
        assert_eq!(config.storage.allowed_extensions.len(), 6);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docdesk.toml");
        std::fs::write(
            &path,
            "[storage]\nupload_dir = \"/srv/docs\"\nallowed_extensions = [\"csv\"]\n",
        )
        .unwrap();

        let config = DeskConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage.allowed_extensions, vec!["csv".to_string()]);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            DeskConfig::load(Some(&path)),
            Err(crate::Error::Toml(_))
        ));
    }
}
