//! SQLite connection pool and schema bootstrap.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Default maximum connections for file-backed databases.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a connection waits for another writer's lock before `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool for `database_url` and make sure the schema exists.
///
/// An in-memory database lives only as long as its connection, so
/// `sqlite::memory:` gets exactly one connection that is never recycled.
/// File databases are created if missing.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?
    };

    migrate(&pool).await?;
    Ok(pool)
}

/// Create the `todos` table if it does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::debug!("ensuring todos schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos (completed)")
        .execute(pool)
        .await?;

    Ok(())
}
