//! Broker-level errors.

/// Failures in the queue or relay backends.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker database error")]
    Database(#[from] sqlx::Error),

    #[error("broker migration failed")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("job payload serialization failed")]
    Payload(#[from] serde_json::Error),
}
