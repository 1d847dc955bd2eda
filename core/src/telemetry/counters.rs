//! telemetry/counters.rs
//! Mutable counters collected while a worker runs.
//!
//! Summary: chunk and byte counts on both sides of the transform, plus the
//! CRC-32 of the uncompressed side (what a zip entry header needs).
//! Converted into an immutable `TelemetrySnapshot` on demand.
use crate::compression::Action;
use crate::utils::update_checksum;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct WorkerCounters {
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub chunks_out: u64,
    pub bytes_out: u64,
    pub uncompressed_crc32: u32,
}

impl WorkerCounters {
    /// Record one chunk handed to the worker.
    pub fn add_input(&mut self, action: Action, data: &[u8]) {
        self.chunks_in += 1;
        self.bytes_in += data.len() as u64;
        if action == Action::Compress {
            self.uncompressed_crc32 = update_checksum(self.uncompressed_crc32, data);
        }
    }

    /// Record one chunk pushed downstream.
    pub fn add_output(&mut self, action: Action, data: &[u8]) {
        self.chunks_out += 1;
        self.bytes_out += data.len() as u64;
        if action == Action::Decompress {
            self.uncompressed_crc32 = update_checksum(self.uncompressed_crc32, data);
        }
    }

    /// (compressed, uncompressed) byte totals for `action`.
    pub fn sides(&self, action: Action) -> (u64, u64) {
        match action {
            Action::Compress   => (self.bytes_out, self.bytes_in),
            Action::Decompress => (self.bytes_in, self.bytes_out),
        }
    }
}
