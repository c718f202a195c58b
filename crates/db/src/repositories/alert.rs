use chrono::{DateTime, Utc};
use sqlx::Row;

use jobwatch_core::domain::alert::{Alert, AlertId, FilterDraft, UserId};

use super::{AlertRepository, RepositoryError};
use crate::DbPool;

pub struct SqlAlertRepository {
    pool: DbPool,
}

impl SqlAlertRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AlertRepository for SqlAlertRepository {
    async fn create(
        &self,
        user_id: &UserId,
        filters: FilterDraft,
    ) -> Result<Alert, RepositoryError> {
        let alert = Alert {
            id: AlertId::generate(),
            user_id: user_id.clone(),
            filters,
            created_at: Utc::now(),
        };

        let filters_json = serde_json::to_string(&alert.filters)
            .map_err(|err| RepositoryError::Decode(err.to_string()))?;

        sqlx::query(
            "INSERT INTO alerts (id, user_id, filters, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&alert.id.0)
        .bind(&alert.user_id.0)
        .bind(&filters_json)
        .bind(alert.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(alert)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Alert>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, user_id, filters, created_at
             FROM alerts
             WHERE user_id = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(&user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }

    async fn delete_by_id(&self, id: &AlertId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = ?1")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn decode_row(row: sqlx::sqlite::SqliteRow) -> Result<Alert, RepositoryError> {
    let filters_json = row.get::<String, _>("filters");
    let filters: FilterDraft = serde_json::from_str(&filters_json)
        .map_err(|err| RepositoryError::Decode(format!("filters column: {err}")))?;

    let created_at_raw = row.get::<String, _>("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map_err(|err| RepositoryError::Decode(format!("created_at column: {err}")))?
        .with_timezone(&Utc);

    Ok(Alert {
        id: AlertId(row.get::<String, _>("id")),
        user_id: UserId(row.get::<String, _>("user_id")),
        filters,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use jobwatch_core::domain::alert::{AlertId, FilterDraft, UserId};
    use jobwatch_core::schema::JobType;

    use super::SqlAlertRepository;
    use crate::migrations::run_pending;
    use crate::repositories::AlertRepository;
    use crate::{connect, PoolSettings};

    async fn repository() -> SqlAlertRepository {
        let pool = connect("sqlite::memory:", PoolSettings::default()).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");
        SqlAlertRepository::new(pool)
    }

    fn sample_filters() -> FilterDraft {
        let mut filters = FilterDraft::default();
        filters.category = Some("531770282580668419".to_owned());
        filters.job_type = Some(JobType::Fixed);
        filters.amount_range = Some("100-499".to_owned());
        filters
    }

    #[tokio::test]
    async fn created_alerts_round_trip_through_sqlite() {
        let repo = repository().await;
        let user = UserId("user-1".to_owned());

        let created = repo.create(&user, sample_filters()).await.expect("create alert");
        let listed = repo.list_by_user(&user).await.expect("list alerts");

        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_owner() {
        let repo = repository().await;
        let alice = UserId("alice".to_owned());
        let bob = UserId("bob".to_owned());

        repo.create(&alice, sample_filters()).await.expect("create for alice");
        repo.create(&alice, FilterDraft::default()).await.expect("second for alice");
        repo.create(&bob, FilterDraft::default()).await.expect("create for bob");

        assert_eq!(repo.list_by_user(&alice).await.expect("list alice").len(), 2);
        assert_eq!(repo.list_by_user(&bob).await.expect("list bob").len(), 1);
        assert!(repo
            .list_by_user(&UserId("nobody".to_owned()))
            .await
            .expect("list unknown user")
            .is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = repository().await;
        let user = UserId("user-1".to_owned());
        let created = repo.create(&user, sample_filters()).await.expect("create alert");

        assert!(repo.delete_by_id(&created.id).await.expect("first delete"));
        assert!(!repo.delete_by_id(&created.id).await.expect("second delete"));
        assert!(!repo
            .delete_by_id(&AlertId("never-existed".to_owned()))
            .await
            .expect("delete unknown id"));

        assert!(repo.list_by_user(&user).await.expect("list after delete").is_empty());
    }

    #[tokio::test]
    async fn empty_filter_set_is_persistable() {
        let repo = repository().await;
        let user = UserId("user-1".to_owned());

        let created = repo.create(&user, FilterDraft::default()).await.expect("create alert");
        let listed = repo.list_by_user(&user).await.expect("list alerts");

        assert!(listed[0].filters.is_empty());
        assert_eq!(listed[0].id, created.id);
    }
}
