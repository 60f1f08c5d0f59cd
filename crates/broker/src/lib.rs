//! Broker layer: the job queue between the ingress tier and the worker
//! pool, and the relay that fans throttle commands back out to every
//! gateway instance.
//!
//! Two backends:
//! - [`postgres`] — the production backend. Job dispatch uses
//!   `FOR UPDATE SKIP LOCKED` so a job is claimed by exactly one worker;
//!   the relay rides on `LISTEN`/`NOTIFY` so a command published by any
//!   worker reaches every listening gateway process.
//! - [`memory`] — a single-process backend for development and tests.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod queue;
pub mod relay;
pub mod status;

use std::sync::Arc;

pub use error::BrokerError;
pub use memory::MemoryBroker;
pub use queue::{JobId, JobQueue, QueuedJob};
pub use relay::ThrottleRelay;
pub use status::JobStatus;

/// A connected broker: the queue half and the relay half.
///
/// Both halves may be the same object underneath (the memory backend) or
/// two objects sharing a pool (Postgres).
pub struct Broker {
    pub queue: Arc<dyn JobQueue>,
    pub relay: Arc<dyn ThrottleRelay>,
}

/// Connect to the broker named by `broker_url`.
///
/// `Some(url)` connects to Postgres, runs pending migrations, and starts
/// the relay listener. `None` builds the in-memory backend — only useful
/// when the gateway runs an embedded worker in the same process.
pub async fn connect(broker_url: Option<&str>) -> Result<Broker, BrokerError> {
    match broker_url {
        Some(url) => {
            let pool = postgres::create_pool(url).await?;
            postgres::run_migrations(&pool).await?;
            let queue = Arc::new(postgres::PgJobQueue::new(pool.clone()));
            let relay = postgres::PgRelay::start(pool).await?;
            Ok(Broker { queue, relay })
        }
        None => {
            let broker = Arc::new(MemoryBroker::new());
            Ok(Broker {
                queue: broker.clone(),
                relay: broker,
            })
        }
    }
}
