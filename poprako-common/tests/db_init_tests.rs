//! Tests for database initialization and migrations

use poprako_common::db::init::{create_schema, init_database};
use poprako_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("poprako.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("poprako.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_tables_created() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("poprako.db")).await.unwrap();

    for table in ["comics", "comic_pages", "comic_units", "schema_version"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("poprako.db")).await.unwrap();

    create_schema(&pool).await.unwrap();
    create_schema(&pool).await.unwrap();

    let version = get_schema_version(&pool).await.unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, CURRENT_SCHEMA_VERSION as i64);
}

#[tokio::test]
async fn test_page_deletion_cascades_to_units() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("poprako.db")).await.unwrap();

    sqlx::query("INSERT INTO comics (id, author, title) VALUES ('c1', 'a', 't')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO comic_pages (id, comic_id, page_index, oss_key) VALUES ('p1', 'c1', 1, 'k.png')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO comic_units (id, page_id, unit_index, x_coordinate, y_coordinate) VALUES ('u1', 'p1', 1, 0.5, 0.5)",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("DELETE FROM comic_pages WHERE id = 'p1'")
        .execute(&pool)
        .await
        .unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comic_units")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0, "foreign keys should be enforced on every connection");
}
