//! Todo repository: storage access for every query the service needs.
//!
//! Every function borrows a `SqliteConnection` instead of the pool, so the
//! caller decides whether it runs standalone or inside a transaction.
//! Storage errors are returned as-is.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::models::{Todo, TodoPayload};

const COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM todos ORDER BY id"))
        .fetch_all(&mut *conn)
        .await
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_completed(
    conn: &mut SqliteConnection,
    completed: bool,
) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM todos WHERE completed = ?1 ORDER BY id"
    ))
    .bind(completed)
    .fetch_all(&mut *conn)
    .await
}

/// Case-insensitive substring match on `title` with Unicode lowercase
/// mapping; SQLite's `LIKE` and `lower()` fold ASCII only. An empty `text`
/// matches every row.
pub async fn find_by_title_containing(
    conn: &mut SqliteConnection,
    text: &str,
) -> Result<Vec<Todo>, sqlx::Error> {
    let needle = text.to_lowercase();
    let rows = find_all(conn).await?;
    Ok(rows
        .into_iter()
        .filter(|todo| todo.title.to_lowercase().contains(&needle))
        .collect())
}

/// Insert a new row when `id` is `None`, otherwise overwrite title,
/// description and completed on row `id`. Returns the stored row.
pub async fn save(
    conn: &mut SqliteConnection,
    id: Option<i64>,
    fields: &TodoPayload,
) -> Result<Todo, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as(&format!(
        r#"
        INSERT INTO todos (id, title, description, completed, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT (id) DO UPDATE
        SET title = excluded.title,
            description = excluded.description,
            completed = excluded.completed,
            updated_at = excluded.updated_at
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&fields.title)
    .bind(fields.description.as_deref())
    .bind(fields.completed)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn exists_by_id(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM todos WHERE id = ?1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Returns the number of rows removed.
pub async fn delete_by_id(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use sqlx::SqlitePool;

    async fn pool() -> SqlitePool {
        create_pool("sqlite::memory:", 1).await.unwrap()
    }

    fn payload(title: &str, completed: bool) -> TodoPayload {
        TodoPayload {
            title: title.to_string(),
            description: None,
            completed,
        }
    }

    #[tokio::test]
    async fn save_without_id_assigns_one() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let first = save(&mut conn, None, &payload("one", false)).await.unwrap();
        let second = save(&mut conn, None, &payload("two", false)).await.unwrap();

        assert!(first.id > 0);
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn save_with_id_overwrites_in_place() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let created = save(&mut conn, None, &payload("before", false)).await.unwrap();
        let fields = TodoPayload {
            title: "after".to_string(),
            description: Some("details".to_string()),
            completed: true,
        };
        let updated = save(&mut conn, Some(created.id), &fields).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.description.as_deref(), Some("details"));
        assert!(updated.completed);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(find_all(&mut conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_missing_is_none() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        assert!(find_by_id(&mut conn, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_completed_partitions_rows() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        save(&mut conn, None, &payload("a", true)).await.unwrap();
        save(&mut conn, None, &payload("b", false)).await.unwrap();
        save(&mut conn, None, &payload("c", true)).await.unwrap();

        let done = find_by_completed(&mut conn, true).await.unwrap();
        let open = find_by_completed(&mut conn, false).await.unwrap();

        assert_eq!(done.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(open.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), ["b"]);
    }

    #[tokio::test]
    async fn title_search_ignores_case() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        save(&mut conn, None, &payload("Buy Milk", false)).await.unwrap();
        save(&mut conn, None, &payload("Walk dog", false)).await.unwrap();

        for needle in ["milk", "MILK", "k"] {
            let found = find_by_title_containing(&mut conn, needle).await.unwrap();
            assert!(
                found.iter().any(|t| t.title == "Buy Milk"),
                "{needle} should match Buy Milk"
            );
        }
        assert_eq!(find_by_title_containing(&mut conn, "milk").await.unwrap().len(), 1);
        assert_eq!(find_by_title_containing(&mut conn, "").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn title_search_folds_unicode_case() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        save(&mut conn, None, &payload("Café Ölbestellung", false)).await.unwrap();

        for needle in ["CAFÉ", "öl", "ÖLBESTELLUNG"] {
            let found = find_by_title_containing(&mut conn, needle).await.unwrap();
            assert_eq!(found.len(), 1, "{needle}");
        }
    }

    #[tokio::test]
    async fn title_search_treats_wildcards_literally() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        save(&mut conn, None, &payload("50% off", false)).await.unwrap();
        save(&mut conn, None, &payload("500 items", false)).await.unwrap();

        let found = find_by_title_containing(&mut conn, "0%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "50% off");

        assert!(find_by_title_containing(&mut conn, "_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let todo = save(&mut conn, None, &payload("gone soon", false)).await.unwrap();

        assert!(exists_by_id(&mut conn, todo.id).await.unwrap());
        assert_eq!(delete_by_id(&mut conn, todo.id).await.unwrap(), 1);
        assert!(!exists_by_id(&mut conn, todo.id).await.unwrap());
        assert_eq!(delete_by_id(&mut conn, todo.id).await.unwrap(), 0);
    }
}
