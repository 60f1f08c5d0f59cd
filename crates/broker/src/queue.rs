//! The job queue seam between the ingress tier and the worker pool.

use async_trait::async_trait;
use mower_core::types::CaptureJob;

use crate::error::BrokerError;

/// Broker-assigned job identifier.
pub type JobId = i64;

/// A job claimed from the queue, paired with its identifier so the worker
/// can report the terminal transition.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub id: JobId,
    pub job: CaptureJob,
}

/// Asynchronous task queue decoupling request acceptance from processing.
///
/// [`enqueue`](JobQueue::enqueue) is fire-and-forget from the ingress
/// handler's perspective: it never waits on worker availability. A job is
/// delivered to exactly one claimant among an arbitrary-sized worker pool;
/// no ordering is guaranteed between jobs. The queue is the sole
/// synchronization point between the two tiers — no shared memory.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Insert a job in `Pending` state and return its id.
    async fn enqueue(&self, job: CaptureJob) -> Result<JobId, BrokerError>;

    /// Atomically claim the oldest pending job, moving it to `Running`.
    ///
    /// Returns `None` when the queue is empty. Two concurrent claims never
    /// return the same job.
    async fn claim(&self) -> Result<Option<QueuedJob>, BrokerError>;

    /// Mark a running job `Completed`.
    async fn complete(&self, id: JobId) -> Result<(), BrokerError>;

    /// Mark a running job `Failed` with an operational error message.
    async fn fail(&self, id: JobId, error: &str) -> Result<(), BrokerError>;
}
