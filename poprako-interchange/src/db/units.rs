//! Unit reads and writes

use crate::error::Result;
use poprako_common::db::models::{ComicUnit, NewComicUnit};
use sqlx::SqliteConnection;

/// Units of one page ordered by unit index
pub async fn get_units_by_page(conn: &mut SqliteConnection, page_id: &str) -> Result<Vec<ComicUnit>> {
    let units = sqlx::query_as::<_, ComicUnit>(
        r#"
        SELECT id, page_id, unit_index, x_coordinate, y_coordinate, is_in_box,
               translated_text, translator_id, translator_comment,
               proved_text, proved, proofreader_id, proofreader_comment,
               creator_id
        FROM comic_units
        WHERE page_id = ?
        ORDER BY unit_index ASC
        "#,
    )
    .bind(page_id)
    .fetch_all(conn)
    .await?;

    Ok(units)
}

/// Delete units by id, returning the number of rows removed
pub async fn delete_units(conn: &mut SqliteConnection, ids: &[String]) -> Result<u64> {
    let mut deleted = 0;

    for id in ids {
        deleted += sqlx::query("DELETE FROM comic_units WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }

    Ok(deleted)
}

/// Insert new unit rows, returning the number of rows written
pub async fn create_units(conn: &mut SqliteConnection, rows: &[NewComicUnit]) -> Result<u64> {
    let mut written = 0;

    for row in rows {
        written += sqlx::query(
            r#"
            INSERT INTO comic_units (
                id, page_id, unit_index, x_coordinate, y_coordinate, is_in_box,
                translated_text, translator_id, translator_comment,
                proved_text, proved, proofreader_id, proofreader_comment,
                creator_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.page_id)
        .bind(row.unit_index)
        .bind(row.x_coordinate)
        .bind(row.y_coordinate)
        .bind(row.is_in_box)
        // translator layer
        .bind(&row.translated_text)
        .bind(&row.translator_id)
        .bind(&row.translator_comment)
        // proofreader layer
        .bind(&row.proved_text)
        .bind(row.proved)
        .bind(&row.proofreader_id)
        .bind(&row.proofreader_comment)
        .bind(&row.creator_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    Ok(written)
}
