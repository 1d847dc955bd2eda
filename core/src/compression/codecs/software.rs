//! compression/codecs/software.rs
//!
//! Push-based raw deflate/inflate codec on top of `flate2::Compress` and
//! `flate2::Decompress` (no zlib header, -15 window).
//!
//! Design notes:
//! - Output is collected into a buffer of exactly `chunk_size` capacity; each
//!   time it fills, the `on_data` callback receives it.
//! - The final push drains the codec and hands over the partial remainder.
//! - Nothing runs on another thread: every callback fires inside `push`.

use bytes::Bytes;
use flate2::{Compress, Decompress, FlushCompress, FlushDecompress, Status};

use crate::compression::types::{Action, CompressionError, CompressionLevel};

/// Callback invoked once per produced output unit.
pub type OnData = Box<dyn FnMut(Bytes) + Send>;

#[derive(Debug, Clone, Copy)]
pub struct SoftwareCodecOptions {
    pub chunk_size: usize,
    pub level: CompressionLevel,
}

enum Engine {
    Deflate(Compress),
    Inflate(Decompress),
}

/// Fixed-capacity output buffer plus the callback it drains into.
struct OutputSink {
    chunk_size: usize,
    buffer: Vec<u8>,
    on_data: Option<OnData>,
}

impl OutputSink {
    // `compress_vec`/`decompress_vec` never grow the buffer past its capacity.
    fn is_full(&self) -> bool {
        self.buffer.len() >= self.chunk_size || self.buffer.len() == self.buffer.capacity()
    }

    fn emit(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let unit = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_size));
        if let Some(on_data) = self.on_data.as_mut() {
            on_data(Bytes::from(unit));
        }
    }
}

pub struct SoftwareCodec {
    engine: Engine,
    sink: OutputSink,
    ended: bool,
    stream_end: bool,
}

fn process_failed(action: Action, msg: impl ToString) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: format!("software/{action}"), msg: msg.to_string() }
}

impl SoftwareCodec {
    pub fn new(action: Action, options: SoftwareCodecOptions) -> Result<Self, CompressionError> {
        if options.chunk_size == 0 {
            return Err(CompressionError::CodecInitFailed {
                codec: format!("software/{action}"),
                msg: "chunk size must be non-zero".into(),
            });
        }
        let engine = match action {
            // false = raw deflate, no zlib header
            Action::Compress   => Engine::Deflate(Compress::new(options.level.into(), false)),
            Action::Decompress => Engine::Inflate(Decompress::new(false)),
        };
        Ok(Self {
            engine,
            sink: OutputSink {
                chunk_size: options.chunk_size,
                buffer: Vec::with_capacity(options.chunk_size),
                on_data: None,
            },
            ended: false,
            stream_end: false,
        })
    }

    pub fn set_on_data(&mut self, on_data: OnData) {
        self.sink.on_data = Some(on_data);
    }

    pub fn action(&self) -> Action {
        match self.engine {
            Engine::Deflate(_) => Action::Compress,
            Engine::Inflate(_) => Action::Decompress,
        }
    }

    /// Whether the final push already happened.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Feed `data`; with `is_final` the stream is finished and the remainder emitted.
    pub fn push(&mut self, data: &[u8], is_final: bool) -> Result<(), CompressionError> {
        if self.ended {
            return Err(CompressionError::StateError("push after final chunk".into()));
        }
        match &mut self.engine {
            Engine::Deflate(compressor)   => deflate(compressor, &mut self.sink, data, is_final)?,
            Engine::Inflate(decompressor) => {
                if !self.stream_end {
                    self.stream_end = inflate(decompressor, &mut self.sink, data)?;
                } else if !data.is_empty() {
                    tracing::debug!(trailing = data.len(), "ignoring bytes after end of deflate stream");
                }
                if is_final && !self.stream_end {
                    tracing::warn!(
                        total_in = decompressor.total_in(),
                        "deflate stream ended before its final block"
                    );
                }
            }
        }
        if is_final {
            self.ended = true;
            self.sink.emit();
        }
        Ok(())
    }
}

fn deflate(
    compressor: &mut Compress,
    sink: &mut OutputSink,
    mut input: &[u8],
    is_final: bool,
) -> Result<(), CompressionError> {
    let flush = if is_final { FlushCompress::Finish } else { FlushCompress::None };
    loop {
        let before_in = compressor.total_in();
        let status = compressor
            .compress_vec(input, &mut sink.buffer, flush)
            .map_err(|e| process_failed(Action::Compress, e))?;
        let consumed = (compressor.total_in() - before_in) as usize;
        input = &input[consumed..];

        if sink.is_full() {
            sink.emit();
            continue;
        }
        match status {
            Status::StreamEnd => return Ok(()),
            _ if !is_final && input.is_empty() => return Ok(()),
            _ => {}
        }
    }
}

/// Returns `true` once the end of the deflate stream was reached.
fn inflate(
    decompressor: &mut Decompress,
    sink: &mut OutputSink,
    mut input: &[u8],
) -> Result<bool, CompressionError> {
    loop {
        let before_in = decompressor.total_in();
        let before_out = decompressor.total_out();
        let status = decompressor
            .decompress_vec(input, &mut sink.buffer, FlushDecompress::None)
            .map_err(|e| process_failed(Action::Decompress, e))?;
        let consumed = (decompressor.total_in() - before_in) as usize;
        let produced = (decompressor.total_out() - before_out) as usize;
        input = &input[consumed..];

        if sink.is_full() {
            sink.emit();
            continue;
        }
        if status == Status::StreamEnd {
            if !input.is_empty() {
                tracing::debug!(trailing = input.len(), "ignoring bytes after end of deflate stream");
            }
            return Ok(true);
        }
        if consumed == 0 && produced == 0 {
            return Ok(false);
        }
    }
}
