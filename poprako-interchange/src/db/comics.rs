//! Comic lookups

use crate::error::{InterchangeError, Result};
use poprako_common::db::models::Comic;
use sqlx::SqliteConnection;

/// Load a comic by id, failing with [`InterchangeError::ComicNotFound`]
pub async fn get_comic(conn: &mut SqliteConnection, comic_id: &str) -> Result<Comic> {
    sqlx::query_as::<_, Comic>("SELECT id, author, title FROM comics WHERE id = ?")
        .bind(comic_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| InterchangeError::ComicNotFound(comic_id.to_string()))
}
