//! WebSocket wire protocol.
//!
//! Text frames carry a JSON envelope `{ "event": <name>, "data": ... }`.
//! Two events exist: `imageJson` inbound (a capture request) and
//! `processedImage` outbound (a throttle command).

use mower_core::types::ThrottleCommand;
use serde::{Deserialize, Serialize};

/// Inbound capture request event name.
pub const EVENT_IMAGE_JSON: &str = "imageJson";

/// Outbound throttle command event name.
pub const EVENT_PROCESSED_IMAGE: &str = "processedImage";

/// Generic message envelope for both directions.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    pub data: serde_json::Value,
}

/// Payload of the `imageJson` event: two named frames plus the auxiliary
/// length-prefixed array.
#[derive(Debug, Deserialize)]
pub struct ImageJsonData {
    pub name1: String,
    pub image1: String,
    pub name2: String,
    pub image2: String,
    pub arr2: Vec<u32>,
}

/// Serialize a throttle command as a `processedImage` envelope.
pub fn processed_image_text(cmd: &ThrottleCommand) -> String {
    serde_json::json!({
        "event": EVENT_PROCESSED_IMAGE,
        "data": cmd,
    })
    .to_string()
}
