//! telemetry/snapshot.rs
//! Immutable, serializable view of a worker's counters.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::compression::Action;
use crate::telemetry::counters::WorkerCounters;
use crate::worker::BackendKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub worker: String,
    pub action: Action,
    /// `None` until the first chunk or flush picked a backend.
    pub backend: Option<BackendKind>,
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub chunks_out: u64,
    pub bytes_out: u64,
    pub uncompressed_crc32: u32,
    /// compressed / uncompressed, 0.0 when nothing uncompressed was seen.
    pub compression_ratio: f64,
    pub elapsed: Duration,
}

impl TelemetrySnapshot {
    pub fn from(
        worker: &str,
        action: Action,
        backend: Option<BackendKind>,
        counters: &WorkerCounters,
        elapsed: Duration,
    ) -> Self {
        let (compressed, uncompressed) = counters.sides(action);
        let compression_ratio = if uncompressed > 0 {
            compressed as f64 / uncompressed as f64
        } else {
            0.0
        };

        Self {
            worker: worker.to_string(),
            action,
            backend,
            chunks_in: counters.chunks_in,
            bytes_in: counters.bytes_in,
            chunks_out: counters.chunks_out,
            bytes_out: counters.bytes_out,
            uncompressed_crc32: counters.uncompressed_crc32,
            compression_ratio,
            elapsed,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
