//! poprako-interchange - LabelPlus / Poprako JSON import and export
//!
//! Resolves the root folder (CLI > `POPRAKO_ROOT_FOLDER` > TOML > OS default),
//! opens the SQLite database and runs one export or import.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poprako_common::config::TomlConfig;
use poprako_common::db::init_database;
use poprako_interchange::{ImportOptions, ProjectExporter, ProjectFormat, ProjectImporter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for poprako-interchange
#[derive(Parser, Debug)]
#[command(name = "poprako-interchange")]
#[command(about = "Import and export comic translation projects")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder holding the database and export directory
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a comic to a LabelPlus file in the export directory
    Export {
        /// Comic id
        #[arg(long)]
        comic: String,
    },
    /// Merge a project file into a comic's pages
    Import {
        /// Comic id
        #[arg(long)]
        comic: String,

        /// Project file
        #[arg(long)]
        file: PathBuf,

        /// Project format; chosen from the file extension when omitted
        #[arg(long)]
        format: Option<ProjectFormat>,

        /// Write the proofreader layer instead of the translator layer
        #[arg(long)]
        proofreader: bool,

        /// Acting user id
        #[arg(long, env = "POPRAKO_USER")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        build = env!("POPRAKO_BUILD"),
        "Starting poprako-interchange"
    );

    let paths = config.resolve_paths(args.root_folder.as_deref());
    info!("Root folder: {}", paths.root_folder.display());
    info!("Database path: {}", paths.database_path.display());

    let pool = match init_database(&paths.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    match args.command {
        Command::Export { comic } => {
            let exporter = ProjectExporter::new(pool, paths.export_dir.clone())
                .with_max_exports(config.max_exports);
            let path = exporter
                .export_project(&comic)
                .await
                .with_context(|| format!("Failed to export comic {comic}"))?;
            println!("{}", path.display());
        }
        Command::Import {
            comic,
            file,
            format,
            proofreader,
            user,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let options = ImportOptions::new(proofreader, user);
            let importer = ProjectImporter::new(pool);

            let result = match format {
                Some(format) => importer.import_project(&bytes, &comic, format, &options).await,
                None => importer.import_file(&file_name(&file), &bytes, &comic, &options).await,
            };

            match result {
                Ok(report) => println!(
                    "replaced {} page(s), skipped {} proofread page(s), wrote {} unit(s)",
                    report.pages_replaced, report.pages_skipped, report.units_written
                ),
                Err(e) => {
                    error!(comic_id = %comic, category = ?e.category(), "Import failed: {}", e);
                    return Err(e).with_context(|| format!("Failed to import {}", file.display()));
                }
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
