use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{Chunk, FlateError, Meta};

/// What a worker sends downstream.
#[derive(Debug)]
pub enum WorkerEvent {
    Data(Chunk),
    /// Terminal. Nothing follows an error.
    Error(FlateError),
    /// Terminal. Sent after the last `Data`.
    End,
}

/// Chained push worker protocol.
pub trait ChunkWorker {
    fn process_chunk(&mut self, chunk: Chunk) -> Result<(), FlateError>;
    fn flush(&mut self) -> Result<(), FlateError>;
    fn clean_up(&mut self);
    fn pause(&mut self) -> bool;
    fn resume(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    Stream,
    Software,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Stream   => f.write_str("stream"),
            BackendKind::Software => f.write_str("software"),
        }
    }
}

/// One concrete codec behind a worker. Output goes to the downstream the
/// backend was built with; `close` ends with `WorkerEvent::End` once the
/// backend's last unit is out.
pub trait FlateBackend: Send {
    fn kind(&self) -> BackendKind;
    fn ingest(&mut self, data: Bytes, meta: &Meta) -> Result<(), FlateError>;
    fn close(&mut self) -> Result<(), FlateError>;
}
