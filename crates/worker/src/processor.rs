//! Capture job execution: decode, persist, derive, publish.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat};
use mower_broker::ThrottleRelay;
use mower_core::error::CoreError;
use mower_core::throttle::ThrottlePolicy;
use mower_core::types::{CaptureJob, ImagePayload, ThrottleCommand};

/// Executes one [`CaptureJob`] to completion.
///
/// The relay handle is injected at construction so the worker publishes to
/// the same broadcast relay the gateway tier subscribes to, without any
/// process-global state.
pub struct FrameProcessor {
    storage_root: PathBuf,
    policy: Arc<dyn ThrottlePolicy>,
    relay: Arc<dyn ThrottleRelay>,
}

impl FrameProcessor {
    pub fn new(
        storage_root: impl Into<PathBuf>,
        policy: Arc<dyn ThrottlePolicy>,
        relay: Arc<dyn ThrottleRelay>,
    ) -> Self {
        Self {
            storage_root: storage_root.into(),
            policy,
            relay,
        }
    }

    /// Run all processing steps for one job.
    ///
    /// Both frames are fully decoded before anything is written, so an
    /// undecodable payload never leaves a partial pair on disk. On success
    /// the derived command has been published (best-effort) and is
    /// returned; on error nothing was published.
    pub async fn process(&self, job: &CaptureJob) -> Result<ThrottleCommand, CoreError> {
        let first = decode_frame(&job.first)?;
        let second = decode_frame(&job.second)?;

        self.store_frame(&first, &job.first.file_name()).await?;
        self.store_frame(&second, &job.second.file_name()).await?;

        let drive = self.policy.derive(&first, &second);
        let cmd = ThrottleCommand {
            name: job.first.file_name(),
            left_throttle: drive.left,
            right_throttle: drive.right,
        };

        // Best-effort: the frames are already persisted, so a relay failure
        // does not fail the job.
        if let Err(e) = self.relay.publish(cmd.clone()).await {
            tracing::warn!(name = %cmd.name, error = %e, "Throttle broadcast failed");
        }

        Ok(cmd)
    }

    /// Re-encode a decoded frame as PNG and write it under the storage
    /// root. An existing file with the same name is overwritten silently.
    async fn store_frame(&self, frame: &DynamicImage, file_name: &str) -> Result<(), CoreError> {
        let storage = |source| CoreError::Storage {
            file_name: file_name.to_string(),
            source,
        };

        let mut encoded = Vec::new();
        frame
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|e| storage(std::io::Error::other(e)))?;

        tokio::fs::create_dir_all(&self.storage_root)
            .await
            .map_err(storage)?;
        tokio::fs::write(self.storage_root.join(file_name), encoded)
            .await
            .map_err(storage)?;

        Ok(())
    }
}

/// Decode one payload: base64 text, then the image codec.
fn decode_frame(payload: &ImagePayload) -> Result<DynamicImage, CoreError> {
    let bytes = general_purpose::STANDARD
        .decode(&payload.data)
        .map_err(|source| CoreError::Decode {
            name: payload.name.clone(),
            source,
        })?;

    image::load_from_memory(&bytes).map_err(|source| CoreError::Codec {
        name: payload.name.clone(),
        source,
    })
}
