use std::sync::Arc;

use mower_core::throttle::SpinInPlace;
use mower_worker::{FrameProcessor, WorkerConfig, WorkerRunner};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mower_worker=debug,mower_broker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(images_dir = %config.images_dir.display(), "Loaded worker configuration");

    let broker = mower_broker::connect(Some(&config.broker_url))
        .await
        .expect("Failed to connect to broker");
    tracing::info!("Broker connected");

    let processor = FrameProcessor::new(
        config.images_dir.clone(),
        Arc::new(SpinInPlace),
        Arc::clone(&broker.relay),
    );
    let runner = WorkerRunner::new(
        Arc::clone(&broker.queue),
        processor,
        config.poll_interval,
        config.job_timeout,
    );

    let cancel = CancellationToken::new();
    let runner_cancel = cancel.clone();
    let runner_handle = tokio::spawn(async move {
        runner.run(runner_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = runner_handle.await;

    broker.relay.shutdown();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
