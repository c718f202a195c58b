use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

/// Pool sizing knobs, mirroring the `[database]` config section.
#[derive(Clone, Copy, Debug)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { max_connections: 5, acquire_timeout_secs: 30 }
    }
}

/// Opens a SQLite pool with the pragmas every connection needs: WAL so
/// wizard saves and API reads can overlap, foreign keys on, and a busy
/// timeout so a held write lock waits instead of failing immediately.
pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::{connect, PoolSettings};

    #[tokio::test]
    async fn every_connection_enforces_foreign_keys() {
        let pool = connect(
            "sqlite::memory:",
            PoolSettings { max_connections: 1, acquire_timeout_secs: 5 },
        )
        .await
        .expect("connect");

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("pragma query");
        assert_eq!(foreign_keys, 1);

        pool.close().await;
    }
}
