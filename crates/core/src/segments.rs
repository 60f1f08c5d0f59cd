//! Length-prefixed segment decoding for the auxiliary `arr2` array.
//!
//! The client flattens a list of variable-length integer sequences into a
//! single array: each segment is its length `s` followed by `s` payload
//! elements. Decoding is the pure inverse of that flattening.

use crate::error::CoreError;

/// Decode a flat length-prefixed array into its segments.
///
/// Scans left to right: at cursor `i`, `arr[i]` declares the segment
/// length, the payload is `arr[i + 1 ..= i + s]`, and the next segment
/// starts at `i + s + 1`. The scan must land exactly on `arr.len()`;
/// a prefix that would read past the end fails with
/// [`CoreError::MalformedArray`] rather than silently truncating.
///
/// An empty array yields zero segments; a `0` prefix yields one empty
/// segment. Segment order equals scan order.
pub fn decode_segments(arr: &[u32]) -> Result<Vec<Vec<u32>>, CoreError> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < arr.len() {
        let declared = arr[i] as usize;
        let remaining = arr.len() - i - 1;
        if declared > remaining {
            return Err(CoreError::MalformedArray {
                index: i,
                declared,
                remaining,
            });
        }
        segments.push(arr[i + 1..i + 1 + declared].to_vec());
        i += declared + 1;
    }

    Ok(segments)
}
