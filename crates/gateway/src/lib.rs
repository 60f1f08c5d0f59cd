//! Gateway server library.
//!
//! Terminates realtime client connections, validates and enqueues capture
//! jobs, and fans incoming throttle commands out to every connected
//! client. Exposed as a library so integration tests and the binary
//! entrypoint share the same building blocks.

pub mod broadcast;
pub mod config;
pub mod ingress;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod ws;
