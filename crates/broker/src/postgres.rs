//! Postgres broker backend.
//!
//! The queue half stores jobs in the `capture_jobs` table and claims them
//! with `FOR UPDATE SKIP LOCKED`, so any number of worker processes can
//! poll concurrently without double-dispatch. The relay half rides on
//! `LISTEN`/`NOTIFY`: `publish` is a `pg_notify`, and a background
//! listener task on each subscribing process mirrors notifications into a
//! local broadcast channel.

use async_trait::async_trait;
use mower_core::types::{CaptureJob, ThrottleCommand};
use sqlx::postgres::{PgListener, PgPoolOptions};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::BrokerError;
use crate::queue::{JobId, JobQueue, QueuedJob};
use crate::relay::ThrottleRelay;
use crate::status::JobStatus;

/// NOTIFY channel carrying serialized throttle commands.
const RELAY_CHANNEL: &str = "mower_throttle_commands";

/// Buffer capacity for the local fan-out channel.
const RELAY_CAPACITY: usize = 1024;

/// Create a connection pool for the broker database.
pub async fn create_pool(broker_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(broker_url)
        .await
}

/// Apply pending broker schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// ---------------------------------------------------------------------------
// PgJobQueue
// ---------------------------------------------------------------------------

/// Durable job queue over the `capture_jobs` table.
pub struct PgJobQueue {
    pool: PgPool,
}

impl PgJobQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn enqueue(&self, job: CaptureJob) -> Result<JobId, BrokerError> {
        let payload = serde_json::to_value(&job)?;
        let id: JobId = sqlx::query_scalar(
            "INSERT INTO capture_jobs (status_id, payload) VALUES ($1, $2) RETURNING id",
        )
        .bind(JobStatus::Pending.id())
        .bind(&payload)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn claim(&self) -> Result<Option<QueuedJob>, BrokerError> {
        let row: Option<(JobId, serde_json::Value)> = sqlx::query_as(
            "UPDATE capture_jobs \
             SET status_id = $1, claimed_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM capture_jobs \
                 WHERE status_id = $2 AND claimed_at IS NULL \
                 ORDER BY submitted_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, payload",
        )
        .bind(JobStatus::Running.id())
        .bind(JobStatus::Pending.id())
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, payload)) = row else {
            return Ok(None);
        };

        // The job schema is validated here, at the consumer boundary. A row
        // that does not deserialize is failed in place rather than handed
        // to the worker or retried forever.
        match serde_json::from_value::<CaptureJob>(payload) {
            Ok(job) => Ok(Some(QueuedJob { id, job })),
            Err(e) => {
                tracing::error!(job_id = id, error = %e, "Undeserializable job payload");
                self.fail(id, &format!("invalid job payload: {e}")).await?;
                Ok(None)
            }
        }
    }

    async fn complete(&self, id: JobId) -> Result<(), BrokerError> {
        sqlx::query(
            "UPDATE capture_jobs \
             SET status_id = $2, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Completed.id())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), BrokerError> {
        sqlx::query(
            "UPDATE capture_jobs \
             SET status_id = $2, error_message = $3, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PgRelay
// ---------------------------------------------------------------------------

/// Cross-instance relay over `LISTEN`/`NOTIFY`.
///
/// Created with [`PgRelay::start`], which spawns the listener task that
/// bridges database notifications into the local broadcast channel.
pub struct PgRelay {
    pool: PgPool,
    sender: broadcast::Sender<ThrottleCommand>,
    listener_task: tokio::task::JoinHandle<()>,
}

impl PgRelay {
    /// Connect a listener on the relay channel and start mirroring
    /// notifications into the local fan-out.
    pub async fn start(pool: PgPool) -> Result<Arc<Self>, BrokerError> {
        let (sender, _) = broadcast::channel(RELAY_CAPACITY);

        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(RELAY_CHANNEL).await?;

        let task_sender = sender.clone();
        let listener_task = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        match serde_json::from_str::<ThrottleCommand>(notification.payload()) {
                            Ok(cmd) => {
                                let _ = task_sender.send(cmd);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Dropping unparseable relay payload");
                            }
                        }
                    }
                    Err(e) => {
                        // PgListener reconnects internally; transient errors
                        // surface here between attempts.
                        tracing::warn!(error = %e, "Relay listener error, retrying");
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Arc::new(Self {
            pool,
            sender,
            listener_task,
        }))
    }
}

#[async_trait]
impl ThrottleRelay for PgRelay {
    async fn publish(&self, cmd: ThrottleCommand) -> Result<(), BrokerError> {
        let payload = serde_json::to_string(&cmd)?;
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(RELAY_CHANNEL)
            .bind(&payload)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ThrottleCommand> {
        self.sender.subscribe()
    }

    fn shutdown(&self) {
        self.listener_task.abort();
    }
}
