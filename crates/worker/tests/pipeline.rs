//! End-to-end tests for the worker pipeline over the in-memory broker.
//!
//! Cover the full claim → decode → persist → derive → publish path,
//! failure isolation, and the no-cross-talk property for concurrent jobs.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use mower_broker::{JobQueue, JobStatus, MemoryBroker, ThrottleRelay};
use mower_core::throttle::SpinInPlace;
use mower_core::types::{CaptureJob, ImagePayload};
use mower_worker::{FrameProcessor, WorkerRunner};
use tokio_util::sync::CancellationToken;

/// Encode a solid-color 2x2 PNG and return its base64 text form.
fn png_base64(color: [u8; 4]) -> String {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba(color)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("PNG encoding of a tiny image cannot fail");
    general_purpose::STANDARD.encode(&buf)
}

fn valid_job(first_name: &str, second_name: &str) -> CaptureJob {
    CaptureJob::new(
        ImagePayload::new(first_name, png_base64([255, 0, 0, 255])),
        ImagePayload::new(second_name, png_base64([0, 0, 255, 255])),
    )
}

fn processor(dir: &tempfile::TempDir, broker: &Arc<MemoryBroker>) -> FrameProcessor {
    FrameProcessor::new(
        dir.path(),
        Arc::new(SpinInPlace),
        Arc::clone(broker) as Arc<dyn ThrottleRelay>,
    )
}

/// Wait until the broker reports a terminal status for the job.
async fn wait_for_terminal(broker: &MemoryBroker, id: i64) -> JobStatus {
    for _ in 0..500 {
        match broker.status(id).await {
            Some(status @ (JobStatus::Completed | JobStatus::Failed)) => return status,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {id} never reached a terminal status");
}

// ---------------------------------------------------------------------------
// Test: a valid job persists both frames and publishes one command
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_job_persists_frames_and_broadcasts() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());
    let mut rx = broker.subscribe();

    let cmd = processor(&dir, &broker)
        .process(&valid_job("left", "right"))
        .await
        .expect("processing a valid job should succeed");

    assert_eq!(cmd.name, "left.png");
    assert_eq!(cmd.left_throttle, 1.0);
    assert_eq!(cmd.right_throttle, -1.0);

    // Both frames stored under the client-supplied names.
    let left = image::open(dir.path().join("left.png")).unwrap();
    let right = image::open(dir.path().join("right.png")).unwrap();
    assert_eq!(left.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(right.to_rgba8().get_pixel(1, 1), &Rgba([0, 0, 255, 255]));

    // Exactly one command on the relay, matching the returned one.
    assert_eq!(rx.recv().await.unwrap(), cmd);
    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: invalid base64 fails the job before anything touches disk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_base64_writes_nothing_and_broadcasts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());
    let mut rx = broker.subscribe();

    let job = CaptureJob::new(
        ImagePayload::new("left", "not-valid-base64!!!"),
        ImagePayload::new("right", png_base64([0, 255, 0, 255])),
    );

    let err = processor(&dir, &broker).process(&job).await.unwrap_err();
    assert!(matches!(err, mower_core::CoreError::Decode { .. }));

    // Neither frame was written — not even the valid second one.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: valid base64 of non-image bytes is a codec failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_image_bytes_fail_with_codec_error() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());

    let job = CaptureJob::new(
        ImagePayload::new("left", general_purpose::STANDARD.encode(b"plain text")),
        ImagePayload::new("right", png_base64([0, 255, 0, 255])),
    );

    let err = processor(&dir, &broker).process(&job).await.unwrap_err();
    assert!(matches!(err, mower_core::CoreError::Codec { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ---------------------------------------------------------------------------
// Test: runner drives a failed job to Failed without a broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn runner_marks_bad_job_failed_without_broadcast() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());
    let mut rx = broker.subscribe();

    let job = CaptureJob::new(
        ImagePayload::new("left", "%%%"),
        ImagePayload::new("right", png_base64([9, 9, 9, 255])),
    );
    let id = broker.enqueue(job).await.unwrap();

    let runner = WorkerRunner::new(
        Arc::clone(&broker) as Arc<dyn JobQueue>,
        processor(&dir, &broker),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { runner.run(run_cancel).await });

    assert_eq!(wait_for_terminal(&broker, id).await, JobStatus::Failed);
    assert!(rx.try_recv().is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    cancel.cancel();
    handle.await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: N distinct jobs yield exactly N commands with no cross-talk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_jobs_produce_one_command_each() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());
    let mut rx = broker.subscribe();

    let names = ["alpha", "beta", "gamma", "delta"];
    let mut ids = Vec::new();
    for name in names {
        let id = broker
            .enqueue(valid_job(name, &format!("{name}-rear")))
            .await
            .unwrap();
        ids.push(id);
    }

    let runner = WorkerRunner::new(
        Arc::clone(&broker) as Arc<dyn JobQueue>,
        processor(&dir, &broker),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { runner.run(run_cancel).await });

    for id in &ids {
        assert_eq!(wait_for_terminal(&broker, *id).await, JobStatus::Completed);
    }

    // Exactly one command per job, each pairing with its own frame name.
    let mut received = Vec::new();
    for _ in 0..names.len() {
        received.push(rx.recv().await.unwrap().name);
    }
    assert!(rx.try_recv().is_err());

    let mut expected: Vec<String> = names.iter().map(|n| format!("{n}.png")).collect();
    received.sort();
    expected.sort();
    assert_eq!(received, expected);

    cancel.cancel();
    handle.await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: a job that exceeds the deadline is failed, not left running
// ---------------------------------------------------------------------------

/// Relay whose `publish` never resolves, stalling the final pipeline step.
struct StalledRelay {
    sender: tokio::sync::broadcast::Sender<mower_core::types::ThrottleCommand>,
}

impl StalledRelay {
    fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(1);
        Self { sender }
    }
}

#[async_trait::async_trait]
impl ThrottleRelay for StalledRelay {
    async fn publish(
        &self,
        _cmd: mower_core::types::ThrottleCommand,
    ) -> Result<(), mower_broker::BrokerError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<mower_core::types::ThrottleCommand> {
        self.sender.subscribe()
    }
}

#[tokio::test]
async fn deadline_expiry_marks_the_job_failed() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());

    let id = broker.enqueue(valid_job("left", "right")).await.unwrap();

    // Stall the relay so processing can never finish inside the deadline.
    let processor = FrameProcessor::new(
        dir.path(),
        Arc::new(SpinInPlace),
        Arc::new(StalledRelay::new()),
    );
    let runner = WorkerRunner::new(
        Arc::clone(&broker) as Arc<dyn JobQueue>,
        processor,
        Duration::from_millis(10),
        Duration::from_millis(200),
    );
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { runner.run(run_cancel).await });

    assert_eq!(wait_for_terminal(&broker, id).await, JobStatus::Failed);

    cancel.cancel();
    handle.await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: a later capture with the same name overwrites the stored frame
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_name_overwrites_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(MemoryBroker::new());
    let p = processor(&dir, &broker);

    let red = CaptureJob::new(
        ImagePayload::new("cam", png_base64([255, 0, 0, 255])),
        ImagePayload::new("rear", png_base64([0, 0, 0, 255])),
    );
    let green = CaptureJob::new(
        ImagePayload::new("cam", png_base64([0, 255, 0, 255])),
        ImagePayload::new("rear", png_base64([0, 0, 0, 255])),
    );

    p.process(&red).await.unwrap();
    p.process(&green).await.unwrap();

    let stored = image::open(dir.path().join("cam.png")).unwrap();
    assert_eq!(stored.to_rgba8().get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
}
