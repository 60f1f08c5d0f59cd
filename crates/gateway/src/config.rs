//! Gateway configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Postgres broker URL (`BROKER_URL`). When unset the gateway runs the
    /// in-memory broker with an embedded worker — single-process mode.
    pub broker_url: Option<String>,
    /// Storage root for the embedded worker (default: `images`).
    pub images_dir: PathBuf,
    /// Embedded worker polling interval (default: `1000` ms).
    pub poll_interval: Duration,
    /// Embedded worker per-job deadline (default: `30` s).
    pub job_timeout: Duration,
    /// Interval between WebSocket heartbeat pings (default: `30` s).
    pub heartbeat_interval: Duration,
}

impl GatewayConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default  |
    /// |--------------------|----------|
    /// | `HOST`             | `0.0.0.0`|
    /// | `PORT`             | `8000`   |
    /// | `BROKER_URL`       | unset    |
    /// | `IMAGES_DIR`       | `images` |
    /// | `POLL_INTERVAL_MS` | `1000`   |
    /// | `JOB_TIMEOUT_SECS` | `30`     |
    /// | `HEARTBEAT_INTERVAL_SECS` | `30` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let broker_url = std::env::var("BROKER_URL").ok();

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

        let heartbeat_interval_secs: u64 = std::env::var("HEARTBEAT_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("HEARTBEAT_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            broker_url,
            images_dir,
            poll_interval: Duration::from_millis(poll_interval_ms),
            job_timeout: Duration::from_secs(job_timeout_secs),
            heartbeat_interval: Duration::from_secs(heartbeat_interval_secs),
        }
    }
}
