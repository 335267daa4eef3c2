//! Database Test Utilities

use anyhow::Result;
use poprako_common::db::init_database;
use poprako_common::db::models::ComicUnit;
use poprako_interchange::db::units;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Create a temporary database with the schema applied
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> Result<(TempDir, SqlitePool)> {
    let temp_dir = TempDir::new()?;
    let pool = init_database(&temp_dir.path().join("test_poprako.db")).await?;
    Ok((temp_dir, pool))
}

/// Insert a comic with `page_count` pages; page ids are `{comic_id}-p{index}`
/// and object keys `comics/{comic_id}/{index}.jpg`
pub async fn seed_comic(
    pool: &SqlitePool,
    comic_id: &str,
    author: &str,
    title: &str,
    page_count: usize,
) -> Result<Vec<String>> {
    sqlx::query("INSERT INTO comics (id, author, title) VALUES (?, ?, ?)")
        .bind(comic_id)
        .bind(author)
        .bind(title)
        .execute(pool)
        .await?;

    let mut page_ids = Vec::with_capacity(page_count);
    for index in 1..=page_count as i64 {
        let page_id = format!("{comic_id}-p{index}");
        sqlx::query(
            "INSERT INTO comic_pages (id, comic_id, page_index, oss_key, uploaded) VALUES (?, ?, ?, ?, 1)",
        )
        .bind(&page_id)
        .bind(comic_id)
        .bind(index)
        .bind(format!("comics/{comic_id}/{index}.jpg"))
        .execute(pool)
        .await?;
        page_ids.push(page_id);
    }

    Ok(page_ids)
}

/// Stored unit fixture
#[derive(Debug, Clone, Default)]
pub struct SeedUnit {
    pub id: String,
    pub index: i64,
    pub x: f64,
    pub y: f64,
    pub in_box: bool,
    pub translated_text: Option<String>,
    pub translator_comment: Option<String>,
    pub proved_text: Option<String>,
    pub proved: bool,
    pub proofreader_comment: Option<String>,
}

pub async fn seed_unit(pool: &SqlitePool, page_id: &str, unit: &SeedUnit) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO comic_units (
            id, page_id, unit_index, x_coordinate, y_coordinate, is_in_box,
            translated_text, translator_comment, proved_text, proved, proofreader_comment
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&unit.id)
    .bind(page_id)
    .bind(unit.index)
    .bind(unit.x)
    .bind(unit.y)
    .bind(unit.in_box)
    .bind(&unit.translated_text)
    .bind(&unit.translator_comment)
    .bind(&unit.proved_text)
    .bind(unit.proved)
    .bind(&unit.proofreader_comment)
    .execute(pool)
    .await?;

    Ok(())
}

/// Units of a page ordered by index
pub async fn fetch_units(pool: &SqlitePool, page_id: &str) -> Result<Vec<ComicUnit>> {
    let mut conn = pool.acquire().await?;
    Ok(units::get_units_by_page(&mut *conn, page_id).await?)
}

pub async fn count_units(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM comic_units")
        .fetch_one(pool)
        .await?)
}

/// Make every insert of a unit into `page_id` abort
pub async fn install_failing_trigger(pool: &SqlitePool, page_id: &str) -> Result<()> {
    // trigger bodies cannot take bound parameters
    let sql = format!(
        "CREATE TRIGGER fail_unit_insert BEFORE INSERT ON comic_units \
         WHEN NEW.page_id = '{}' \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END",
        page_id.replace('\'', "''")
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}
