//! Frame file naming convention.

/// Fixed extension for stored frames; the worker always re-encodes to PNG.
pub const FRAME_EXTENSION: &str = ".png";

/// Build the storage file name for a client-supplied frame name.
///
/// The name is treated as a key: two concurrent captures using the same
/// name race on the same file and the last writer wins.
pub fn frame_file_name(name: &str) -> String {
    format!("{name}{FRAME_EXTENSION}")
}
