//! Project import: parse, then merge into stored pages in one transaction
//!
//! **Algorithm:**
//! 1. Parse the whole file (no database access on failure)
//! 2. Take the per-comic lock, begin an IMMEDIATE transaction so the write
//!    lock (and the busy timeout) applies before the first read
//! 3. Require the parsed page count to equal the stored page count
//! 4. Pair the n-th parsed page with the n-th stored page by page index
//! 5. For each pair: skip when a translator import meets a proofread unit,
//!    otherwise delete the page's units and insert the parsed ones
//! 6. Commit; any error before this point rolls everything back

use crate::db::{comics, pages, units};
use crate::error::{InterchangeError, Result};
use crate::format::ProjectFormat;
use crate::labelplus::writer::page_image_name;
use crate::model::{ImportOptions, ImportReport, ImportRole, ParsedPage, ParsedUnit, UnitText};
use poprako_common::db::models::{ComicPage, NewComicUnit};
use poprako_common::uuid_utils;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Takes the SQLite write lock up front; a deferred transaction that reads
/// and then writes fails with SQLITE_BUSY once another writer commits
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Imports project files into existing comics
pub struct ProjectImporter {
    pool: SqlitePool,
    comic_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectImporter {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            comic_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Import an uploaded file, choosing the format from its extension
    pub async fn import_file(
        &self,
        file_name: &str,
        bytes: &[u8],
        comic_id: &str,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let format = match ProjectFormat::from_file_name(file_name) {
            Ok(format) => format,
            Err(e) => {
                warn!(comic_id, file_name, error = %e, "Rejected project upload");
                return Err(e);
            }
        };

        self.import_project(bytes, comic_id, format, options).await
    }

    /// Parse `bytes` as `format` and merge the result into `comic_id`
    pub async fn import_project(
        &self,
        bytes: &[u8],
        comic_id: &str,
        format: ProjectFormat,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let parsed = format.parse(bytes)?;

        let lock = self.comic_lock(comic_id).await;
        let outcome = {
            let _guard = lock.lock().await;
            self.merge_in_transaction(comic_id, &parsed, options).await
        };
        drop(lock);
        self.release_comic_lock(comic_id).await;
        let report = outcome?;

        info!(
            comic_id,
            %format,
            role = ?options.role,
            pages_replaced = report.pages_replaced,
            pages_skipped = report.pages_skipped,
            units_deleted = report.units_deleted,
            units_written = report.units_written,
            "Imported project"
        );

        Ok(report)
    }

    async fn merge_in_transaction(
        &self,
        comic_id: &str,
        parsed: &[ParsedPage],
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;
        comics::get_comic(&mut *tx, comic_id).await?;
        let report = merge_pages(&mut *tx, comic_id, parsed, options).await?;
        tx.commit().await?;
        Ok(report)
    }

    async fn comic_lock(&self, comic_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.comic_locks.lock().await;
        locks
            .entry(comic_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Forget the lock of `comic_id` once no import holds or waits on it
    async fn release_comic_lock(&self, comic_id: &str) {
        let mut locks = self.comic_locks.lock().await;
        if locks.get(comic_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(comic_id);
        }
    }

    /// Number of comics with a live import lock
    pub async fn tracked_comics(&self) -> usize {
        self.comic_locks.lock().await.len()
    }
}

/// Merge parsed pages into the stored pages of a comic
///
/// Runs on the caller's connection; wrap it in a transaction to get
/// all-or-nothing behaviour.
pub async fn merge_pages(
    conn: &mut SqliteConnection,
    comic_id: &str,
    parsed: &[ParsedPage],
    options: &ImportOptions,
) -> Result<ImportReport> {
    let stored = pages::get_pages_by_comic(conn, comic_id).await?;

    if parsed.len() != stored.len() {
        return Err(InterchangeError::PageCountMismatch {
            file: parsed.len(),
            database: stored.len(),
        });
    }

    let mut report = ImportReport::default();

    for (parsed_page, stored_page) in parsed.iter().zip(&stored) {
        warn_on_name_mismatch(parsed_page, stored_page);

        let existing = units::get_units_by_page(conn, &stored_page.id).await?;

        if options.role == ImportRole::Translator && existing.iter().any(|u| u.proved) {
            tracing::debug!(
                page_id = %stored_page.id,
                page_index = stored_page.page_index,
                "Skipping proofread page"
            );
            report.pages_skipped += 1;
            continue;
        }

        let ids: Vec<String> = existing.into_iter().map(|u| u.id).collect();
        report.units_deleted += units::delete_units(conn, &ids).await? as usize;

        let rows: Vec<NewComicUnit> = parsed_page
            .units
            .iter()
            .map(|unit| unit_row(&stored_page.id, unit, options))
            .collect();
        report.units_written += units::create_units(conn, &rows).await? as usize;
        report.pages_replaced += 1;
    }

    Ok(report)
}

/// Map a parsed unit to a new row according to the importer role
///
/// | role        | text source | written layer                                 |
/// |-------------|-------------|-----------------------------------------------|
/// | Proofreader | plain       | `proved_text = main text`, `proved = true`    |
/// | Proofreader | layered     | both texts and `is_proved` passed through     |
/// | Translator  | plain       | `translated_text = main text`, `proved = false` |
/// | Translator  | layered     | `translated_text` only, `proved = false`      |
pub fn unit_row(page_id: &str, unit: &ParsedUnit, options: &ImportOptions) -> NewComicUnit {
    let actor = Some(options.acting_user_id.clone());

    let (translated_text, proved_text, proved) = match (options.role, &unit.text) {
        (ImportRole::Proofreader, UnitText::Plain { main_text }) => (None, main_text.clone(), true),
        (
            ImportRole::Proofreader,
            UnitText::Layered {
                translated_text,
                proved_text,
                is_proved,
                ..
            },
        ) => (translated_text.clone(), proved_text.clone(), *is_proved),
        (ImportRole::Translator, UnitText::Plain { main_text }) => (main_text.clone(), None, false),
        (ImportRole::Translator, UnitText::Layered { translated_text, .. }) => {
            (translated_text.clone(), None, false)
        }
    };

    let (translator_id, proofreader_id) = match options.role {
        ImportRole::Translator => (actor.clone(), None),
        ImportRole::Proofreader => (None, actor.clone()),
    };

    NewComicUnit {
        id: uuid_utils::generate_key(),
        page_id: page_id.to_string(),
        unit_index: unit.index,
        x_coordinate: unit.x,
        y_coordinate: unit.y,
        is_in_box: unit.is_in_box,
        translated_text,
        translator_id,
        translator_comment: unit.translator_comment.clone(),
        proved_text,
        proved,
        proofreader_id,
        proofreader_comment: unit.proofreader_comment.clone(),
        creator_id: actor,
    }
}

fn warn_on_name_mismatch(parsed: &ParsedPage, stored: &ComicPage) {
    let Some(name) = parsed.image_name.as_deref() else {
        return;
    };
    let expected = page_image_name(stored.page_index, &stored.oss_key);
    if name != expected {
        warn!(
            page_id = %stored.id,
            page_index = stored.page_index,
            file_image = name,
            expected_image = %expected,
            "Image name differs from stored page; merging by position"
        );
    }
}
