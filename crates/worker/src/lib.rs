//! Worker tier: claims capture jobs from the broker, decodes and persists
//! both frames, derives a throttle command, and publishes it on the relay.

pub mod config;
pub mod processor;
pub mod runner;

pub use config::WorkerConfig;
pub use processor::FrameProcessor;
pub use runner::WorkerRunner;
