//! Throttle derivation policy.
//!
//! The pipeline turns a decoded capture into a drive command through a
//! [`ThrottlePolicy`]. The policy is the seam for a real control algorithm;
//! the worker never assumes anything about how the command is derived.

use image::DynamicImage;

/// A differential drive signal: per-track throttle in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    pub left: f32,
    pub right: f32,
}

/// Derives a [`Drive`] from the two decoded frames of a capture.
///
/// Implementations must be pure with respect to the pipeline: no
/// persistence, no publishing — the worker owns those side effects.
pub trait ThrottlePolicy: Send + Sync {
    fn derive(&self, first: &DynamicImage, second: &DynamicImage) -> Drive;
}

/// Placeholder policy: spin in place at full differential, regardless of
/// input. Stands in until a vision-based controller lands.
pub struct SpinInPlace;

impl ThrottlePolicy for SpinInPlace {
    fn derive(&self, _first: &DynamicImage, _second: &DynamicImage) -> Drive {
        Drive {
            left: 1.0,
            right: -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_in_place_ignores_input() {
        let img = DynamicImage::new_rgba8(2, 2);
        let drive = SpinInPlace.derive(&img, &img);
        assert_eq!(drive, Drive { left: 1.0, right: -1.0 });
    }
}
