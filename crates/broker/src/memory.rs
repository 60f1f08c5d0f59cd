//! Single-process broker backend.
//!
//! Backs the queue with a mutex-guarded deque and the relay with a
//! `tokio::sync::broadcast` channel. Used by the gateway's embedded-worker
//! mode (no `BROKER_URL`) and by tests; semantics match the Postgres
//! backend minus durability.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use mower_core::types::{CaptureJob, ThrottleCommand};
use tokio::sync::{broadcast, Mutex};

use crate::error::BrokerError;
use crate::queue::{JobId, JobQueue, QueuedJob};
use crate::relay::ThrottleRelay;
use crate::status::JobStatus;

/// Buffer capacity for the relay broadcast channel.
const RELAY_CAPACITY: usize = 1024;

/// In-memory queue + relay. Implements both broker traits on one object;
/// clone the `Arc` to hand out the two halves.
pub struct MemoryBroker {
    jobs: Mutex<VecDeque<QueuedJob>>,
    statuses: Mutex<HashMap<JobId, JobStatus>>,
    next_id: AtomicI64,
    sender: broadcast::Sender<ThrottleCommand>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(RELAY_CAPACITY);
        Self {
            jobs: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            sender,
        }
    }

    /// Current status of a job, if it was ever enqueued. Test hook; the
    /// Postgres backend exposes the same information via the jobs table.
    pub async fn status(&self, id: JobId) -> Option<JobStatus> {
        self.statuses.lock().await.get(&id).copied()
    }
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for MemoryBroker {
    async fn enqueue(&self, job: CaptureJob) -> Result<JobId, BrokerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // The status must be recorded before the job becomes claimable;
        // otherwise a fast worker's terminal transition could be
        // overwritten with Pending. Terminal states are never revisited.
        self.statuses.lock().await.insert(id, JobStatus::Pending);
        self.jobs.lock().await.push_back(QueuedJob { id, job });
        Ok(id)
    }

    async fn claim(&self) -> Result<Option<QueuedJob>, BrokerError> {
        let claimed = self.jobs.lock().await.pop_front();
        if let Some(ref queued) = claimed {
            self.statuses
                .lock()
                .await
                .insert(queued.id, JobStatus::Running);
        }
        Ok(claimed)
    }

    async fn complete(&self, id: JobId) -> Result<(), BrokerError> {
        self.statuses.lock().await.insert(id, JobStatus::Completed);
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), BrokerError> {
        tracing::debug!(job_id = id, error, "Job marked failed");
        self.statuses.lock().await.insert(id, JobStatus::Failed);
        Ok(())
    }
}

#[async_trait]
impl ThrottleRelay for MemoryBroker {
    async fn publish(&self, cmd: ThrottleCommand) -> Result<(), BrokerError> {
        // A send error only means there are zero subscribers right now.
        let _ = self.sender.send(cmd);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ThrottleCommand> {
        self.sender.subscribe()
    }
}
