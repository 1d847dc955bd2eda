//! compression/stream.rs
//! Duplex compression/decompression streams.
//!
//! A stream is opened by format name and handed out as two halves:
//! - `StreamWriter` enqueues input and never blocks on the codec.
//! - `StreamReader` blocks for the next produced unit, or the terminal signal.
//!
//! The codec itself runs on a dedicated transform thread owning a `flate2::write`
//! encoder/decoder. Each write carries a tag (the chunk metadata); every unit read
//! back carries the tag of the latest write the transform had consumed when it
//! produced that unit.

use std::io::Write;
use std::thread;

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver, Sender};
use flate2::{write, Compression};

use crate::compression::constants::formats;
use crate::compression::types::{Action, CompressionError};
use crate::constants::TRANSFORM_THREAD_NAME;
use crate::types::Meta;

enum StreamCommand {
    Write { data: Bytes, meta: Meta },
    Close,
}

/// Result of one `StreamReader::read`.
#[derive(Debug)]
pub enum StreamRead {
    Value(Bytes, Meta),
    /// Terminal: no further output.
    Done,
    /// Terminal: the transform failed.
    Failed(CompressionError),
}

pub struct StreamWriter {
    tx: Sender<StreamCommand>,
}

impl StreamWriter {
    /// Enqueue `data`. Fails only when the transform has already stopped.
    pub fn write(&self, data: Bytes, meta: Meta) -> Result<(), CompressionError> {
        self.tx
            .send(StreamCommand::Write { data, meta })
            .map_err(|_| CompressionError::StreamClosed)
    }

    /// Signal end of input. The reader sees `Done` once the remainder is out.
    pub fn close(&self) -> Result<(), CompressionError> {
        self.tx.send(StreamCommand::Close).map_err(|_| CompressionError::StreamClosed)
    }
}

pub struct StreamReader {
    rx: Receiver<StreamRead>,
}

impl StreamReader {
    /// Block for the next unit. A transform that went away without closing
    /// (writer dropped) reads as `Done`.
    pub fn read(&self) -> StreamRead {
        self.rx.recv().unwrap_or(StreamRead::Done)
    }
}

pub struct DuplexStream {
    pub writer: StreamWriter,
    pub reader: StreamReader,
    format: &'static str,
    action: Action,
}

impl DuplexStream {
    /// Open a stream for `action` in `format` (see [`formats`]).
    pub fn open(action: Action, format: &str) -> Result<Self, CompressionError> {
        let format = formats::SUPPORTED
            .iter()
            .copied()
            .find(|f| *f == format)
            .ok_or_else(|| CompressionError::UnsupportedFormat { format: format.to_string() })?;

        let (cmd_tx, cmd_rx) = unbounded::<StreamCommand>();
        let (out_tx, out_rx) = unbounded::<StreamRead>();
        let transform = Transform::new(action, format);

        thread::Builder::new()
            .name(format!("{TRANSFORM_THREAD_NAME}-{format}"))
            .spawn(move || run_transform(transform, cmd_rx, out_tx))
            .map_err(|e| CompressionError::CodecInitFailed { codec: format.to_string(), msg: e.to_string() })?;

        Ok(Self {
            writer: StreamWriter { tx: cmd_tx },
            reader: StreamReader { rx: out_rx },
            format,
            action,
        })
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn into_parts(self) -> (StreamWriter, StreamReader) {
        (self.writer, self.reader)
    }
}

/// Transform loop. Exits on close, on failure, or when the writer is dropped.
fn run_transform(mut transform: Transform, rx: Receiver<StreamCommand>, tx: Sender<StreamRead>) {
    let mut last_meta = Meta::default();
    while let Ok(cmd) = rx.recv() {
        match cmd {
            StreamCommand::Write { data, meta } => {
                last_meta = meta;
                match transform.write(&data) {
                    Ok(out) if out.is_empty() => {}
                    Ok(out) => {
                        let _ = tx.send(StreamRead::Value(out, last_meta.clone()));
                    }
                    Err(e) => {
                        // writers see `StreamClosed` from here on
                        drop(rx);
                        let _ = tx.send(StreamRead::Failed(e));
                        return;
                    }
                }
            }
            StreamCommand::Close => {
                match transform.finish() {
                    Ok(out) => {
                        if !out.is_empty() {
                            let _ = tx.send(StreamRead::Value(out, last_meta));
                        }
                        let _ = tx.send(StreamRead::Done);
                    }
                    Err(e) => {
                        let _ = tx.send(StreamRead::Failed(e));
                    }
                }
                return;
            }
        }
    }
    tracing::trace!("stream writer dropped without close");
}

enum Transform {
    DeflateRaw(write::DeflateEncoder<Vec<u8>>),
    InflateRaw(write::DeflateDecoder<Vec<u8>>),
    Zlib(write::ZlibEncoder<Vec<u8>>),
    Unzlib(write::ZlibDecoder<Vec<u8>>),
    Gzip(write::GzEncoder<Vec<u8>>),
    Gunzip(write::GzDecoder<Vec<u8>>),
}

impl Transform {
    // Platform streams take no level: always the codec default.
    fn new(action: Action, format: &'static str) -> Self {
        let level = Compression::default();
        match (action, format) {
            (Action::Compress, formats::DEFLATE)   => Transform::Zlib(write::ZlibEncoder::new(Vec::new(), level)),
            (Action::Decompress, formats::DEFLATE) => Transform::Unzlib(write::ZlibDecoder::new(Vec::new())),
            (Action::Compress, formats::GZIP)      => Transform::Gzip(write::GzEncoder::new(Vec::new(), level)),
            (Action::Decompress, formats::GZIP)    => Transform::Gunzip(write::GzDecoder::new(Vec::new())),
            (Action::Compress, _)                  => Transform::DeflateRaw(write::DeflateEncoder::new(Vec::new(), level)),
            (Action::Decompress, _)                => Transform::InflateRaw(write::DeflateDecoder::new(Vec::new())),
        }
    }

    fn codec(&self) -> &'static str {
        match self {
            Transform::DeflateRaw(_) | Transform::InflateRaw(_) => formats::DEFLATE_RAW,
            Transform::Zlib(_) | Transform::Unzlib(_)           => formats::DEFLATE,
            Transform::Gzip(_) | Transform::Gunzip(_)           => formats::GZIP,
        }
    }

    /// Feed input and take whatever output is ready.
    fn write(&mut self, data: &[u8]) -> Result<Bytes, CompressionError> {
        let codec = self.codec();
        let failed = |e: std::io::Error| CompressionError::CodecProcessFailed { codec: codec.into(), msg: e.to_string() };
        let out = match self {
            Transform::DeflateRaw(w) => { w.write_all(data).map_err(failed)?; std::mem::take(w.get_mut()) }
            Transform::InflateRaw(w) => { feed_decoder(w, data).map_err(failed)?; std::mem::take(w.get_mut()) }
            Transform::Zlib(w)       => { w.write_all(data).map_err(failed)?; std::mem::take(w.get_mut()) }
            Transform::Unzlib(w)     => { feed_decoder(w, data).map_err(failed)?; std::mem::take(w.get_mut()) }
            Transform::Gzip(w)       => { w.write_all(data).map_err(failed)?; std::mem::take(w.get_mut()) }
            Transform::Gunzip(w)     => { feed_decoder(w, data).map_err(failed)?; std::mem::take(w.get_mut()) }
        };
        Ok(Bytes::from(out))
    }

    /// Drain the codec and return the remainder.
    fn finish(self) -> Result<Bytes, CompressionError> {
        let codec = self.codec();
        let out = match self {
            Transform::DeflateRaw(w) => w.finish(),
            Transform::InflateRaw(w) => w.finish(),
            Transform::Zlib(w)       => w.finish(),
            Transform::Unzlib(w)     => w.finish(),
            Transform::Gzip(w)       => w.finish(),
            Transform::Gunzip(w)     => w.finish(),
        }
        .map_err(|e| CompressionError::CodecProcessFailed { codec: codec.into(), msg: e.to_string() })?;
        Ok(Bytes::from(out))
    }
}

/// Like `write_all`, except that a decoder refusing input (`Ok(0)`) means its
/// stream has ended; whatever is left over is dropped.
fn feed_decoder<W: Write>(decoder: &mut W, mut data: &[u8]) -> std::io::Result<()> {
    while !data.is_empty() {
        match decoder.write(data) {
            Ok(0) => {
                tracing::debug!(trailing = data.len(), "ignoring bytes after end of deflate stream");
                return Ok(());
            }
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Capability probe for duplex streams.
pub trait StreamProvider: Send + Sync {
    fn open(&self, action: Action, format: &str) -> Result<DuplexStream, CompressionError>;
}

/// Default provider: streams backed by transform threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeStreams;

impl StreamProvider for NativeStreams {
    fn open(&self, action: Action, format: &str) -> Result<DuplexStream, CompressionError> {
        DuplexStream::open(action, format)
    }
}

/// Provider for environments without streams. Every probe fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStreams;

impl StreamProvider for DisabledStreams {
    fn open(&self, _action: Action, _format: &str) -> Result<DuplexStream, CompressionError> {
        Err(CompressionError::StreamsUnavailable)
    }
}
