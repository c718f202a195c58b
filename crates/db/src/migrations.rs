use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect, migrations::MIGRATOR, PoolSettings};

    async fn count_schema_object(pool: &sqlx::SqlitePool, kind: &str, name: &str) -> i64 {
        sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = ?1 AND name = ?2",
        )
        .bind(kind)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("check schema object")
        .get::<i64, _>("count")
    }

    #[tokio::test]
    async fn migrations_create_baseline_schema() {
        let pool = connect("sqlite::memory:", PoolSettings::default()).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        assert_eq!(count_schema_object(&pool, "table", "alerts").await, 1);
        assert_eq!(count_schema_object(&pool, "index", "idx_alerts_user_id").await, 1);
    }

    #[tokio::test]
    async fn migrations_are_reversible() {
        let pool = connect("sqlite::memory:", PoolSettings::default()).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        assert_eq!(count_schema_object(&pool, "table", "alerts").await, 0);
        assert_eq!(count_schema_object(&pool, "index", "idx_alerts_user_id").await, 0);
    }
}
