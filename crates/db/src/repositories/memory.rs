use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use jobwatch_core::domain::alert::{Alert, AlertId, FilterDraft, UserId};

use super::{AlertRepository, RepositoryError};

/// In-memory store for tests and local development. `fail_writes` lets a
/// test simulate a store outage without a real database.
#[derive(Default)]
pub struct InMemoryAlertRepository {
    alerts: RwLock<Vec<Alert>>,
    fail_writes: AtomicBool,
}

impl InMemoryAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Decode("simulated store outage".to_owned()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn create(
        &self,
        user_id: &UserId,
        filters: FilterDraft,
    ) -> Result<Alert, RepositoryError> {
        self.check_writable()?;

        let alert = Alert {
            id: AlertId::generate(),
            user_id: user_id.clone(),
            filters,
            created_at: Utc::now(),
        };

        self.alerts.write().await.push(alert.clone());
        Ok(alert)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Alert>, RepositoryError> {
        let alerts = self.alerts.read().await;
        Ok(alerts.iter().filter(|alert| &alert.user_id == user_id).cloned().collect())
    }

    async fn delete_by_id(&self, id: &AlertId) -> Result<bool, RepositoryError> {
        self.check_writable()?;

        let mut alerts = self.alerts.write().await;
        let before = alerts.len();
        alerts.retain(|alert| &alert.id != id);
        Ok(alerts.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use jobwatch_core::domain::alert::{FilterDraft, UserId};

    use super::InMemoryAlertRepository;
    use crate::repositories::AlertRepository;

    #[tokio::test]
    async fn create_list_delete_cycle() {
        let repo = InMemoryAlertRepository::new();
        let user = UserId("u-1".to_owned());

        let alert = repo.create(&user, FilterDraft::default()).await.expect("create");
        assert_eq!(repo.list_by_user(&user).await.expect("list").len(), 1);

        assert!(repo.delete_by_id(&alert.id).await.expect("delete"));
        assert!(!repo.delete_by_id(&alert.id).await.expect("repeat delete"));
        assert!(repo.list_by_user(&user).await.expect("list after delete").is_empty());
    }

    #[tokio::test]
    async fn simulated_outage_fails_writes() {
        let repo = InMemoryAlertRepository::new();
        repo.set_fail_writes(true);

        let result = repo.create(&UserId("u-1".to_owned()), FilterDraft::default()).await;
        assert!(result.is_err());
    }
}
