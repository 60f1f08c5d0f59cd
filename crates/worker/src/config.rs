//! Worker configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a worker process.
///
/// All fields except the broker URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Postgres broker URL (`BROKER_URL`, required).
    pub broker_url: String,
    /// Root directory for stored frames (default: `images`).
    pub images_dir: PathBuf,
    /// Queue polling interval (default: `1000` ms).
    pub poll_interval: Duration,
    /// Per-job processing deadline (default: `30` s). Expiry fails the job.
    pub job_timeout: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Default  |
    /// |--------------------|----------|
    /// | `BROKER_URL`       | required |
    /// | `IMAGES_DIR`       | `images` |
    /// | `POLL_INTERVAL_MS` | `1000`   |
    /// | `JOB_TIMEOUT_SECS` | `30`     |
    pub fn from_env() -> Self {
        let broker_url = std::env::var("BROKER_URL").expect("BROKER_URL must be set");

        let images_dir = std::env::var("IMAGES_DIR")
            .unwrap_or_else(|_| "images".into())
            .into();

        let poll_interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        let job_timeout_secs: u64 = std::env::var("JOB_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("JOB_TIMEOUT_SECS must be a valid u64");

        Self {
            broker_url,
            images_dir,
            poll_interval: Duration::from_millis(poll_interval_ms),
            job_timeout: Duration::from_secs(job_timeout_secs),
        }
    }
}
