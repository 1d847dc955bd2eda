//! compression/mod.rs
//! Raw deflate codecs and the stream primitive the worker sits on.
//!
//! - `codecs`: synchronous push codec with an output callback.
//! - `stream`: duplex transform stream on its own thread, opened by format name.
//! - `registry`: archive compression-method descriptors.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use constants::*;
pub use types::*;
pub use registry::*;
pub use codecs::{OnData, SoftwareCodec, SoftwareCodecOptions};
pub use stream::{
    DisabledStreams,
    DuplexStream,
    NativeStreams,
    StreamProvider,
    StreamRead,
    StreamReader,
    StreamWriter,
};
