pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, DbPool, PoolSettings};
pub use repositories::{
    AlertRepository, InMemoryAlertRepository, RepositoryError, SqlAlertRepository,
};
