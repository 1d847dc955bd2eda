//! flate-worker
//!
//! Streaming raw-deflate worker for archive pipelines.
//! Picks a threaded duplex stream when available, a software codec otherwise.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod compression;
pub mod telemetry;

// Worker layer
pub mod worker;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{
        compress_worker, method_by_magic, uncompress_worker, Action, CompressionError, CompressionMethod,
        FlateOptions, DEFLATE,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{Chunk, FlateError, Meta};
    pub use crate::worker::{collect_bytes, collect_output, ChunkWorker, FlateWorker, WorkerEvent};
}
