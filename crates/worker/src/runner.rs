//! Polling claim loop for the worker process.

use std::sync::Arc;
use std::time::Duration;

use mower_broker::{JobQueue, QueuedJob};
use tokio_util::sync::CancellationToken;

use crate::processor::FrameProcessor;

/// Claims jobs from the queue and drives them through the processor.
///
/// A single long-lived loop: each instance processes one job at a time,
/// concurrently with other worker instances claiming from the same queue.
pub struct WorkerRunner {
    queue: Arc<dyn JobQueue>,
    processor: FrameProcessor,
    poll_interval: Duration,
    job_timeout: Duration,
}

impl WorkerRunner {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        processor: FrameProcessor,
        poll_interval: Duration,
        job_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            processor,
            poll_interval,
            job_timeout,
        }
    }

    /// Run the claim loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            job_timeout_secs = self.job_timeout.as_secs(),
            "Worker runner started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Worker runner shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.drain_queue().await;
                }
            }
        }
    }

    /// Claim and execute jobs until the queue reports empty.
    async fn drain_queue(&self) {
        loop {
            match self.queue.claim().await {
                Ok(Some(queued)) => self.execute(queued).await,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim job");
                    break;
                }
            }
        }
    }

    /// Execute one claimed job under the per-job deadline and record the
    /// terminal transition. A job failure is isolated to that job.
    async fn execute(&self, queued: QueuedJob) {
        let QueuedJob { id, job } = queued;
        tracing::info!(job_id = id, frame = %job.first.name, "Job claimed");

        let outcome = tokio::time::timeout(self.job_timeout, self.processor.process(&job)).await;

        let result = match outcome {
            Ok(Ok(cmd)) => {
                tracing::info!(
                    job_id = id,
                    name = %cmd.name,
                    left = cmd.left_throttle,
                    right = cmd.right_throttle,
                    "Job completed",
                );
                self.queue.complete(id).await
            }
            Ok(Err(e)) => {
                tracing::error!(job_id = id, error = %e, "Job failed");
                self.queue.fail(id, &e.to_string()).await
            }
            Err(_) => {
                tracing::error!(
                    job_id = id,
                    timeout_secs = self.job_timeout.as_secs(),
                    "Job deadline exceeded",
                );
                self.queue.fail(id, "processing deadline exceeded").await
            }
        };

        if let Err(e) = result {
            tracing::error!(job_id = id, error = %e, "Failed to record job outcome");
        }
    }
}
