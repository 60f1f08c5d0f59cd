//! Inbound message handling for WebSocket connections.

use mower_broker::{JobId, JobQueue};
use mower_core::segments::decode_segments;
use mower_core::types::{CaptureJob, ImagePayload};

use crate::protocol::{Envelope, ImageJsonData, EVENT_IMAGE_JSON};

/// Handle one inbound text frame.
///
/// Returns the enqueued job id for an accepted `imageJson` event, `None`
/// otherwise. The handler never does image work itself: it validates the
/// auxiliary array, enqueues, and returns — decoding and persistence are
/// strictly worker-side.
///
/// A malformed `arr2` rejects the request: the job is not created and the
/// condition is logged. No error is surfaced to the client — there is no
/// client-facing error channel in this protocol.
pub async fn handle_message(conn_id: &str, text: &str, queue: &dyn JobQueue) -> Option<JobId> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(e) => {
            tracing::debug!(conn_id, error = %e, "Ignoring non-envelope text frame");
            return None;
        }
    };

    if envelope.event != EVENT_IMAGE_JSON {
        tracing::debug!(conn_id, event = %envelope.event, "Ignoring unknown event");
        return None;
    }

    let data: ImageJsonData = match serde_json::from_value(envelope.data) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Malformed imageJson payload, rejecting");
            return None;
        }
    };

    // Validate the auxiliary array before creating the job. The decoded
    // segments have no downstream consumer yet; well-formedness is still
    // enforced so malformed uploads are caught at the edge.
    match decode_segments(&data.arr2) {
        Ok(segments) => {
            tracing::debug!(conn_id, segments = segments.len(), "Auxiliary array decoded");
        }
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Malformed auxiliary array, rejecting capture");
            return None;
        }
    }

    let job = CaptureJob::new(
        ImagePayload::new(data.name1, data.image1),
        ImagePayload::new(data.name2, data.image2),
    );

    match queue.enqueue(job).await {
        Ok(id) => {
            tracing::info!(conn_id, job_id = id, "Capture job enqueued");
            Some(id)
        }
        Err(e) => {
            tracing::error!(conn_id, error = %e, "Failed to enqueue capture job");
            None
        }
    }
}
