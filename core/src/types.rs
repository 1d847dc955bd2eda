use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::compression::CompressionError;

/// Opaque metadata travelling with a chunk.
///
/// Cloning is cheap (shared map); the worker never looks inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta(Arc<HashMap<String, Value>>);

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Copies the map only when it is shared.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unit of binary data plus metadata flowing through the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub data: Bytes,
    pub meta: Meta,
}

impl Chunk {
    pub fn new(data: impl Into<Bytes>, meta: Meta) -> Self {
        Self { data: data.into(), meta }
    }
}

/// Unified worker error covering configuration, codec and stream failures.
/// - `From<CompressionError>` enables `?` from the software path.
/// - Messages aim to be stable and contextual for logs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FlateError {
    /// Neither backend exists (worker already cleaned up).
    #[error("{operation}() processing object missing")]
    MissingBackend { operation: &'static str },

    /// Input after end-of-input was signalled.
    #[error("{operation}() called after flush")]
    Finished { operation: &'static str },

    #[error("worker already flushed")]
    AlreadyFlushed,

    /// Software codec failure, raised synchronously.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Stream backend write/close/read failure.
    #[error("stream {operation} failed: {source}")]
    StreamIo {
        operation: &'static str,
        #[source]
        source: CompressionError,
    },

    /// Options could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The downstream channel closed before `End`.
    #[error("worker output disconnected before end of stream")]
    Disconnected,
}
