//! Error taxonomy for the capture pipeline.

/// Errors raised while validating ingress data or executing a capture job.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A segment in the auxiliary array declared a length that would read
    /// past the end of the array.
    #[error(
        "malformed segment array: prefix at index {index} declares {declared} \
         elements but only {remaining} remain"
    )]
    MalformedArray {
        index: usize,
        declared: usize,
        remaining: usize,
    },

    /// The base64 text encoding of an image payload is invalid.
    #[error("invalid base64 data for frame '{name}'")]
    Decode {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded bytes do not form an image any supported codec accepts.
    #[error("undecodable image bytes for frame '{name}'")]
    Codec {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// Writing a decoded frame to the storage root failed.
    #[error("failed to store frame '{file_name}'")]
    Storage {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Publishing a throttle command on the relay failed. Best-effort:
    /// callers log and drop, persistence is not rolled back.
    #[error("throttle broadcast failed: {0}")]
    Broadcast(String),
}
