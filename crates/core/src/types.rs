//! Wire and message types shared by the gateway, broker, and worker.

use serde::{Deserialize, Serialize};

use crate::naming::frame_file_name;

/// One camera frame as received from the client: a name and the base64
/// text encoding of the image bytes. Exists only for the duration of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub name: String,
    pub data: String,
}

impl ImagePayload {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// File name this frame is stored under (`<name>.png`).
    pub fn file_name(&self) -> String {
        frame_file_name(&self.name)
    }
}

/// The unit of work enqueued on the job queue: both frames of one capture.
///
/// This is an explicit serializable contract between the ingress tier and
/// the worker tier — the two sides share no code paths at runtime, only
/// this schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureJob {
    pub first: ImagePayload,
    pub second: ImagePayload,
}

impl CaptureJob {
    pub fn new(first: ImagePayload, second: ImagePayload) -> Self {
        Self { first, second }
    }
}

/// Drive command derived from a processed capture, broadcast to every
/// connected client. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleCommand {
    /// File name of the first frame of the originating capture.
    pub name: String,
    pub left_throttle: f32,
    pub right_throttle: f32,
}
