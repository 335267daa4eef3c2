//! LabelPlus export of a stored comic

use crate::db::{comics, pages, units};
use crate::error::Result;
use crate::labelplus::{export_file_name, write_header, write_page, EXPORT_SUFFIX};
use chrono::Local;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Timestamp embedded in export file names
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default number of files kept in the export directory
pub const DEFAULT_MAX_EXPORTS: usize = 30;

/// Writes LabelPlus files for stored comics into one export directory
pub struct ProjectExporter {
    pool: SqlitePool,
    export_dir: PathBuf,
    max_exports: usize,
}

impl ProjectExporter {
    pub fn new(pool: SqlitePool, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            export_dir: export_dir.into(),
            max_exports: DEFAULT_MAX_EXPORTS,
        }
    }

    /// Override how many files the export directory may hold
    pub fn with_max_exports(mut self, max_exports: usize) -> Self {
        self.max_exports = max_exports;
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Export a comic and return the path of the written file
    pub async fn export_project(&self, comic_id: &str) -> Result<PathBuf> {
        let mut conn = self.pool.acquire().await?;

        let comic = comics::get_comic(&mut *conn, comic_id).await?;
        let stored_pages = pages::get_pages_by_comic(&mut *conn, comic_id).await?;

        let mut buf = Vec::new();
        write_header(&mut buf)?;
        let mut unit_count = 0;
        for page in &stored_pages {
            let page_units = units::get_units_by_page(&mut *conn, &page.id).await?;
            unit_count += page_units.len();
            write_page(&mut buf, page, &page_units)?;
        }
        drop(conn);

        tokio::fs::create_dir_all(&self.export_dir).await?;
        self.prune_old_exports().await;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let file_name = export_file_name(&comic.author, &comic.title, &timestamp);
        let path = self.export_dir.join(file_name);

        tokio::fs::write(&path, &buf).await?;

        info!(
            comic_id,
            pages = stored_pages.len(),
            units = unit_count,
            path = %path.display(),
            "Exported project"
        );

        Ok(path)
    }

    /// Delete the oldest export files so at most `max_exports` remain
    ///
    /// Only names ending in [`EXPORT_SUFFIX`] are counted or removed, so an
    /// export directory shared with the database stays safe. Failures only warn.
    async fn prune_old_exports(&self) {
        if let Err(e) = self.try_prune_old_exports().await {
            warn!(dir = %self.export_dir.display(), error = %e, "Failed to clean old exports");
        }
    }

    async fn try_prune_old_exports(&self) -> std::io::Result<()> {
        let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.export_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() || !is_export_file(&entry.file_name()) {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((entry.path(), modified));
        }

        if files.len() <= self.max_exports {
            return Ok(());
        }

        files.sort_by_key(|(_, modified)| *modified);
        let excess = files.len() - self.max_exports;

        for (path, _) in files.into_iter().take(excess) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed old export"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete old export file"),
            }
        }

        Ok(())
    }
}

fn is_export_file(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|name| name.ends_with(EXPORT_SUFFIX))
}
