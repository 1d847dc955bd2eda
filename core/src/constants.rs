/// Zip compression method field for DEFLATE (method 8, little-endian u16).
pub const MAGIC_DEFLATE: [u8; 2] = [0x08, 0x00];

/// Worker names are `"<prefix>/<action>"`, e.g. `FlateWorker/Deflate`.
pub const WORKER_NAME_PREFIX: &str = "FlateWorker";

/// Thread names for the stream backend.
pub const TRANSFORM_THREAD_NAME: &str = "flate-transform";
pub const RELAY_THREAD_NAME: &str = "flate-relay";
