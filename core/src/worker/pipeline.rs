use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender};

use crate::compression::{Action, CompressionError, FlateOptions};
use crate::telemetry::TelemetrySnapshot;
use crate::types::{Chunk, FlateError};
use crate::utils::chunks_to_bytes;
use crate::worker::types::{ChunkWorker, WorkerEvent};
use crate::worker::worker::FlateWorker;

/// Single flate worker loop.
///
/// Feeds every chunk from `rx` through the worker, flushes once the channel
/// closes, then cleans up. The first error stops the loop; the downstream has
/// already been told about it.
pub fn run_flate_worker(rx: Receiver<Chunk>, mut worker: FlateWorker) -> Result<TelemetrySnapshot, FlateError> {
    while let Ok(chunk) = rx.recv() {
        if let Err(e) = worker.process_chunk(chunk) {
            tracing::warn!(worker = %worker.name(), error = %e, "chunk failed");
            worker.clean_up();
            return Err(e);
        }
    }

    let flushed = worker.flush();
    worker.clean_up();
    if let Err(e) = flushed {
        tracing::warn!(worker = %worker.name(), error = %e, "flush failed");
        return Err(e);
    }
    Ok(worker.telemetry())
}

/// Run a worker loop on its own named thread.
pub fn spawn_flate_worker(
    action: Action,
    options: FlateOptions,
    rx: Receiver<Chunk>,
    tx: Sender<WorkerEvent>,
) -> Result<JoinHandle<Result<TelemetrySnapshot, FlateError>>, FlateError> {
    let worker = FlateWorker::new(action, options, tx);
    let name = worker.name().to_owned();
    thread::Builder::new()
        .name(name)
        .spawn(move || run_flate_worker(rx, worker))
        .map_err(|e| FlateError::Compression(CompressionError::from(e)))
}

/// Drain a worker's events until its terminal event.
pub fn collect_output(rx: &Receiver<WorkerEvent>) -> Result<Vec<Chunk>, FlateError> {
    let mut chunks = Vec::new();
    loop {
        match rx.recv() {
            Ok(WorkerEvent::Data(chunk)) => chunks.push(chunk),
            Ok(WorkerEvent::End) => return Ok(chunks),
            Ok(WorkerEvent::Error(e)) => return Err(e),
            Err(_) => return Err(FlateError::Disconnected),
        }
    }
}

/// Like [`collect_output`], flattened into one buffer.
pub fn collect_bytes(rx: &Receiver<WorkerEvent>) -> Result<Vec<u8>, FlateError> {
    collect_output(rx).map(|chunks| chunks_to_bytes(&chunks))
}
