//! Subcommand implementations

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docdesk::{
    config::DeskConfig,
    merge::export,
    server::DeskServer,
    storage::{LocalDocumentStore, UploadPolicy},
    ContentExtractor, DocumentStore, MergeEngine, MergeFormat, SearchEngine,
};

fn open_store(config: &DeskConfig) -> Result<Arc<LocalDocumentStore>> {
    let policy = UploadPolicy::new(&config.storage.allowed_extensions);
    let store = LocalDocumentStore::new(&config.storage.upload_dir, policy).with_context(|| {
        format!(
            "failed to open upload directory {}",
            config.storage.upload_dir.display()
        )
    })?;
    Ok(Arc::new(store))
}

pub fn list(config: &DeskConfig, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let documents = store.list_info()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!(
            "{}",
            style(format!(
                "No documents in {}",
                store.storage_dir().display()
            ))
            .dim()
        );
        return Ok(());
    }

    for doc in &documents {
        println!(
            "{:<40} {:>10}  {}",
            doc.filename,
            doc.size,
            style(doc.file_type.display_name()).dim()
        );
    }
    println!("{} document(s)", documents.len());
    Ok(())
}

pub fn search(config: &DeskConfig, keyword: &str, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let engine = SearchEngine::new(store, ContentExtractor::new());
    let results = engine.search(keyword)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        if result.matched {
            println!("{} {}", style("✓").green().bold(), result.filename);
        } else {
            println!("{} {}", style("·").dim(), style(&result.filename).dim());
        }
    }
    let matched = results.iter().filter(|r| r.matched).count();
    println!("{} of {} matched", matched, results.len());
    Ok(())
}

pub fn merge(
    config: &DeskConfig,
    base: &str,
    candidate: &str,
    output: Option<PathBuf>,
    format: Option<MergeFormat>,
) -> Result<()> {
    let format = format.unwrap_or(config.merge.default_format);
    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("merged.{}", format.file_extension())));

    let store = open_store(config)?;
    let engine = MergeEngine::new(store);
    let table = engine.merge(base, candidate)?;
    let bytes = export::render(&table, format, &config.merge.sheet_name)?;

    std::fs::write(&output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{} {} rows x {} columns -> {}",
        style("Merged").green().bold(),
        table.rows.len(),
        table.columns.len() + 1,
        output.display()
    );
    Ok(())
}

pub fn upload(config: &DeskConfig, paths: &[PathBuf], json: bool) -> Result<()> {
    let store = open_store(config)?;
    let mut stored = Vec::new();

    for path in paths {
        let filename = file_name(path)?;
        let data =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        match store.write_document(&filename, &data) {
            Ok(name) => {
                if !json {
                    println!("{} {} -> {}", style("✓").green(), path.display(), name);
                }
                stored.push(name);
            }
            Err(e) => {
                eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    }
    if stored.is_empty() {
        anyhow::bail!("no files were uploaded");
    }
    Ok(())
}

pub fn delete(config: &DeskConfig, name: &str) -> Result<()> {
    let store = open_store(config)?;
    store.delete_document(name)?;
    println!("{} {}", style("Deleted").yellow(), name);
    Ok(())
}

pub async fn serve(mut config: DeskConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let server = DeskServer::new(config)?;
    println!(
        "{} http://{}",
        style("Serving document desk on").bold(),
        server.address()
    );
    server.start().await?;
    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> DeskConfig {
        let mut config = DeskConfig::default();
        config.storage.upload_dir = dir.join("uploads");
        config
    }

    #[test]
    fn test_upload_then_merge_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let base = dir.path().join("base.csv");
        let people = dir.path().join("people list.csv");
        std::fs::write(&base, "이름,홍길동\n나이,30\n").unwrap();
        std::fs::write(&people, "이름,나이,도시\n김철수,25,부산\n").unwrap();
        upload(&config, &[base, people], true).unwrap();

        let output = dir.path().join("out.csv");
        merge(
            &config,
            "base.csv",
            "people_list.csv",
            Some(output.clone()),
            Some(MergeFormat::Csv),
        )
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "\u{feff}이름,나이\n홍길동,30\n김철수,25\n");
    }

    #[test]
    fn test_upload_rejects_everything_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let script = dir.path().join("run.sh");
        std::fs::write(&script, "echo hi").unwrap();

        assert!(upload(&config, &[script], true).is_err());
    }

    #[test]
    fn test_delete_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(delete(&config, "ghost.csv").is_err());
    }
}
