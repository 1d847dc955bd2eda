//! compression/types.rs
//! Actions, levels, options and the codec-layer error.
use std::fmt;

use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::compression::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_LEVEL_DEFLATE, MAX_CHUNK_SIZE, MAX_LEVEL_DEFLATE};
use crate::types::FlateError;

/// Direction of the transform. Fixed when a worker is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Compress,
    Decompress,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Compress   => "Deflate",
            Action::Decompress => "Inflate",
        };
        f.write_str(name)
    }
}

/// Deflate level requested by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionLevel {
    /// Balanced default (level 6).
    Default,
    /// Explicit level in `1..=9`.
    Precise(u32),
}

impl CompressionLevel {
    /// Resolve an optional numeric level.
    ///
    /// `None` and `Some(0)` both select [`CompressionLevel::Default`], mirroring
    /// archive writers that treat a zero level as "not set".
    pub fn from_requested(level: Option<i32>) -> Result<Self, CompressionError> {
        match level {
            None | Some(0) => Ok(CompressionLevel::Default),
            Some(l @ 1..=MAX_LEVEL_DEFLATE) => Ok(CompressionLevel::Precise(l as u32)),
            Some(l) => Err(CompressionError::InvalidLevel { level: l }),
        }
    }
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Default    => Compression::new(DEFAULT_LEVEL_DEFLATE),
            CompressionLevel::Precise(l) => Compression::new(l),
        }
    }
}

/// Worker configuration.
///
/// Every field is optional; the accessors below resolve defaults and validate.
/// Deserializes from JSON such as `{"level": 6, "native_streams": false}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlateOptions {
    /// Compression strength. `None`/`0` selects the default level.
    pub level: Option<i32>,

    /// Output unit of the software codec. Defaults to 64 KiB.
    pub chunk_size: Option<usize>,

    /// Whether the duplex stream backend may be probed at all.
    /// - `None` or `Some(true)` → probe streams first (default).
    /// - `Some(false)` → always use the software codec.
    pub native_streams: Option<bool>,
}

impl FlateOptions {
    pub fn new(level: Option<i32>) -> Self {
        Self { level, ..Self::default() }
    }

    pub fn software_only() -> Self {
        Self { native_streams: Some(false), ..Self::default() }
    }

    pub fn from_json(raw: &str) -> Result<Self, FlateError> {
        serde_json::from_str(raw).map_err(|e| FlateError::Config(e.to_string()))
    }

    pub fn level(&self) -> Result<CompressionLevel, CompressionError> {
        CompressionLevel::from_requested(self.level)
    }

    pub fn chunk_size(&self) -> Result<usize, CompressionError> {
        match self.chunk_size {
            None => Ok(DEFAULT_CHUNK_SIZE),
            Some(size) if size > 0 && size <= MAX_CHUNK_SIZE => Ok(size),
            Some(size) => Err(CompressionError::InvalidChunkSize { have: size, max: MAX_CHUNK_SIZE }),
        }
    }

    pub fn native_streams(&self) -> bool {
        self.native_streams.unwrap_or(true)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompressionError {
    #[error("compression level {level} is outside the supported range 1-9")]
    InvalidLevel { level: i32 },

    #[error("chunk size {have} must be within 1..={max}")]
    InvalidChunkSize { have: usize, max: usize },

    #[error("unsupported stream format: {format}")]
    UnsupportedFormat { format: String },

    #[error("compression streams are not available")]
    StreamsUnavailable,

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: String, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },

    #[error("stream closed")]
    StreamClosed,

    #[error("compression state error: {0}")]
    StateError(String),
}

impl From<std::io::Error> for CompressionError {
    fn from(e: std::io::Error) -> Self {
        CompressionError::StateError(e.to_string())
    }
}
