//! Page lookups

use crate::error::Result;
use poprako_common::db::models::ComicPage;
use sqlx::SqliteConnection;

/// All pages of a comic in ascending page index order
pub async fn get_pages_by_comic(
    conn: &mut SqliteConnection,
    comic_id: &str,
) -> Result<Vec<ComicPage>> {
    let pages = sqlx::query_as::<_, ComicPage>(
        r#"
        SELECT id, comic_id, page_index, oss_key, size_bytes, uploaded
        FROM comic_pages
        WHERE comic_id = ?
        ORDER BY page_index ASC
        "#,
    )
    .bind(comic_id)
    .fetch_all(conn)
    .await?;

    Ok(pages)
}
