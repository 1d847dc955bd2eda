/// Stream format names understood by the duplex stream primitive.
pub mod formats {
    /// Raw deflate: no zlib/gzip header or trailer.
    pub const DEFLATE_RAW: &str = "deflate-raw";
    /// Deflate inside a zlib wrapper.
    pub const DEFLATE: &str = "deflate";
    /// Deflate inside a gzip wrapper.
    pub const GZIP: &str = "gzip";

    pub const SUPPORTED: &[&str] = &[DEFLATE_RAW, DEFLATE, GZIP];
}

/// Default deflate level (balanced). Used when no level is requested.
pub const DEFAULT_LEVEL_DEFLATE: u32 = 6;

/// Highest level accepted by deflate.
pub const MAX_LEVEL_DEFLATE: i32 = 9;

/// Output unit of the software codec (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;
