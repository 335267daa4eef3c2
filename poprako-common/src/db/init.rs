//! Database initialization
//!
//! Opens (or creates) the SQLite database, applies connection pragmas and
//! creates the comic/page/unit tables before running versioned migrations.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Per-connection SQLite busy timeout
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table and run pending migrations (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_comics_table(pool).await?;
    create_comic_pages_table(pool).await?;
    create_comic_units_table(pool).await?;

    crate::db::migrations::run_migrations(pool).await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the comics table
///
/// Only the columns the interchange needs are owned here; the CRUD layer may
/// add more through its own migrations.
pub async fn create_comics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comics (
            id TEXT PRIMARY KEY,
            author TEXT NOT NULL,
            title TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the comic_pages table
pub async fn create_comic_pages_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic_pages (
            id TEXT PRIMARY KEY,
            comic_id TEXT NOT NULL REFERENCES comics(id) ON DELETE CASCADE,
            page_index INTEGER NOT NULL,
            oss_key TEXT NOT NULL,
            size_bytes INTEGER NOT NULL DEFAULT 0,
            uploaded INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (comic_id, page_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the comic_units table
///
/// A unit carries two parallel layers: the translator layer
/// (`translated_text`, `translator_id`, `translator_comment`) and the
/// proofreader layer (`proved_text`, `proved`, `proofreader_id`,
/// `proofreader_comment`).
pub async fn create_comic_units_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic_units (
            id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL REFERENCES comic_pages(id) ON DELETE CASCADE,
            unit_index INTEGER NOT NULL,
            x_coordinate REAL NOT NULL,
            y_coordinate REAL NOT NULL,
            is_in_box INTEGER NOT NULL DEFAULT 1,
            translated_text TEXT,
            translator_id TEXT,
            translator_comment TEXT,
            proved_text TEXT,
            proved INTEGER NOT NULL DEFAULT 0,
            proofreader_id TEXT,
            proofreader_comment TEXT,
            creator_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
