use async_trait::async_trait;
use thiserror::Error;

use jobwatch_core::domain::alert::{Alert, AlertId, FilterDraft, UserId};

pub mod alert;
pub mod memory;

pub use alert::SqlAlertRepository;
pub use memory::InMemoryAlertRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Persists a new alert with a fresh id and returns the stored record.
    async fn create(
        &self,
        user_id: &UserId,
        filters: FilterDraft,
    ) -> Result<Alert, RepositoryError>;

    /// All alerts owned by the user, oldest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Alert>, RepositoryError>;

    /// Idempotent: deleting an id that is already gone is not an error.
    /// Returns whether a row was actually removed.
    async fn delete_by_id(&self, id: &AlertId) -> Result<bool, RepositoryError>;
}
