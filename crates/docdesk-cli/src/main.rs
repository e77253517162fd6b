//! docdesk command line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docdesk::{config::DeskConfig, MergeFormat};

mod commands;

#[derive(Parser)]
#[command(name = "docdesk")]
#[command(version, about = "Search uploaded documents and merge spreadsheets by key")]
struct Cli {
    /// Path to a TOML config file (defaults to $DOCDESK_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Upload directory, overriding the config
    #[arg(long, global = true)]
    upload_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored documents
    List,

    /// Match a keyword against filenames and document text
    Search {
        /// Case-sensitive keyword
        keyword: String,
    },

    /// Merge a candidate table into a base record
    Merge {
        /// Stored base document (key/value rows)
        base: String,

        /// Stored candidate document (header row, keyed by first column)
        candidate: String,

        /// Output file (default: merged.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: xlsx or csv
        #[arg(short, long)]
        format: Option<MergeFormat>,
    },

    /// Copy local files into the upload directory
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete a stored document
    Delete {
        /// Stored filename
        name: String,
    },

    /// Run the HTTP server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<DeskConfig> {
    let mut config = match &cli.config {
        Some(path) => DeskConfig::load(Some(path.as_path()))?,
        None => DeskConfig::from_env()?,
    };
    if let Some(dir) = &cli.upload_dir {
        config.storage.upload_dir = dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docdesk=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::List => commands::list(&config, json),
        Commands::Search { keyword } => commands::search(&config, &keyword, json),
        Commands::Merge {
            base,
            candidate,
            output,
            format,
        } => commands::merge(&config, &base, &candidate, output, format),
        Commands::Upload { paths } => commands::upload(&config, &paths, json),
        Commands::Delete { name } => commands::delete(&config, &name),
        Commands::Serve { host, port } => commands::serve(config, host, port).await,
    }
}
