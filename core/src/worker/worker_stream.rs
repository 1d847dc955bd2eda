use std::thread::{self, JoinHandle};

use bytes::Bytes;

use crate::compression::{formats, Action, CompressionError, StreamProvider, StreamRead, StreamReader, StreamWriter};
use crate::constants::RELAY_THREAD_NAME;
use crate::types::{Chunk, FlateError, Meta};
use crate::worker::generic::Downstream;
use crate::worker::types::{BackendKind, FlateBackend};

/// Preferred backend: a raw-deflate duplex stream plus a relay thread that
/// forwards everything the stream produces to the downstream.
///
/// Calls never wait for the codec. Failures seen by the relay go to the
/// downstream error channel; failures seen by `ingest`/`close` are returned.
pub struct StreamBackend {
    writer: Option<StreamWriter>,
    relay: Option<JoinHandle<()>>,
}

impl StreamBackend {
    pub fn new(action: Action, provider: &dyn StreamProvider, downstream: Downstream) -> Result<Self, CompressionError> {
        let (writer, reader) = provider.open(action, formats::DEFLATE_RAW)?.into_parts();

        let relay = thread::Builder::new()
            .name(RELAY_THREAD_NAME.into())
            .spawn(move || relay_loop(reader, downstream))
            .map_err(|e| CompressionError::CodecInitFailed { codec: formats::DEFLATE_RAW.into(), msg: e.to_string() })?;

        Ok(Self { writer: Some(writer), relay: Some(relay) })
    }

    fn writer(&self, operation: &'static str) -> Result<&StreamWriter, FlateError> {
        self.writer
            .as_ref()
            .ok_or(FlateError::StreamIo { operation, source: CompressionError::StreamClosed })
    }
}

fn relay_loop(reader: StreamReader, out: Downstream) {
    loop {
        match reader.read() {
            StreamRead::Value(data, meta) => {
                tracing::trace!(len = data.len(), "stream produced chunk");
                out.push(Chunk { data, meta });
            }
            StreamRead::Done => {
                tracing::trace!("stream done");
                out.end();
                return;
            }
            StreamRead::Failed(e) => {
                tracing::warn!(error = %e, "stream transform failed");
                out.error(FlateError::StreamIo { operation: "read", source: e });
                return;
            }
        }
    }
}

fn io_failed(operation: &'static str, source: CompressionError) -> FlateError {
    tracing::warn!(operation, error = %source, "stream backend call failed");
    FlateError::StreamIo { operation, source }
}

impl FlateBackend for StreamBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Stream
    }

    fn ingest(&mut self, data: Bytes, meta: &Meta) -> Result<(), FlateError> {
        self.writer("write")?
            .write(data, meta.clone())
            .map_err(|e| io_failed("write", e))
    }

    fn close(&mut self) -> Result<(), FlateError> {
        self.writer("close")?
            .close()
            .map_err(|e| io_failed("close", e))?;
        self.writer = None;
        Ok(())
    }
}

impl Drop for StreamBackend {
    // Dropping the writer ends the transform (after any queued close), which
    // ends the relay; joining makes all relayed output visible before return.
    fn drop(&mut self) {
        self.writer = None;
        if let Some(relay) = self.relay.take() {
            if relay.join().is_err() {
                tracing::warn!("stream relay thread panicked");
            }
        }
    }
}
