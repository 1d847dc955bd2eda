//! telemetry/mod.rs
//! Worker telemetry: mutable counters and immutable snapshots.
//!
//! - Compression ratio is `compressed / uncompressed` whichever way the worker runs.
//! - The CRC-32 always covers the uncompressed bytes.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
