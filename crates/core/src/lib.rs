//! Domain logic for the mower vision offload backend.
//!
//! Pure types and computations only — no I/O. The broker, worker, and
//! gateway crates build on top of this.

pub mod error;
pub mod naming;
pub mod segments;
pub mod throttle;
pub mod types;

pub use error::CoreError;
