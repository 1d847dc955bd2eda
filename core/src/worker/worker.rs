use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::Sender;

use crate::compression::{Action, DisabledStreams, FlateOptions, NativeStreams, StreamProvider};
use crate::constants::WORKER_NAME_PREFIX;
use crate::telemetry::TelemetrySnapshot;
use crate::types::{Chunk, FlateError, Meta};
use crate::worker::generic::{Downstream, GenericWorker};
use crate::worker::types::{BackendKind, ChunkWorker, FlateBackend, WorkerEvent};
use crate::worker::worker_software::SoftwareCodecBackend;
use crate::worker::worker_stream::StreamBackend;

/// Factory: probe the stream provider, fall back to the software codec.
///
/// The probe failure is expected on stream-less setups and is only logged.
pub fn make_backend(
    action: Action,
    options: &FlateOptions,
    provider: &dyn StreamProvider,
    downstream: &Downstream,
) -> Result<Box<dyn FlateBackend>, FlateError> {
    match StreamBackend::new(action, provider, downstream.clone()) {
        Ok(backend) => {
            tracing::debug!(%action, "using stream backend");
            Ok(Box::new(backend))
        }
        Err(e) => {
            tracing::debug!(%action, reason = %e, "streams unavailable, using software codec");
            let backend = SoftwareCodecBackend::new(action, options, downstream.clone())?;
            Ok(Box::new(backend))
        }
    }
}

enum WorkerState {
    Uninitialized,
    Initialized(Box<dyn FlateBackend>),
    Flushed(Box<dyn FlateBackend>),
    CleanedUp,
}

/// Raw-deflate worker over whichever backend is available.
///
/// Lifecycle: `Uninitialized → Initialized → Flushed → CleanedUp`, one way only.
/// The backend is picked once, on the first chunk or on a flush with no data.
///
/// Calls after the end of input are rejected:
/// - `process_chunk` after `flush` → [`FlateError::Finished`]
/// - `process_chunk`/`flush` after `clean_up` → [`FlateError::MissingBackend`]
pub struct FlateWorker {
    base: GenericWorker,
    action: Action,
    options: FlateOptions,
    provider: Arc<dyn StreamProvider>,
    state: WorkerState,
    backend_kind: Option<BackendKind>,
    meta: Meta,
    started: Instant,
}

impl FlateWorker {
    /// Build a worker whose stream probe follows `options.native_streams`.
    pub fn new(action: Action, options: FlateOptions, tx: Sender<WorkerEvent>) -> Self {
        let provider: Arc<dyn StreamProvider> = if options.native_streams() {
            Arc::new(NativeStreams)
        } else {
            Arc::new(DisabledStreams)
        };
        Self::with_stream_provider(action, options, tx, provider)
    }

    pub fn with_stream_provider(
        action: Action,
        options: FlateOptions,
        tx: Sender<WorkerEvent>,
        provider: Arc<dyn StreamProvider>,
    ) -> Self {
        Self {
            base: GenericWorker::new(format!("{WORKER_NAME_PREFIX}/{action}"), action, tx),
            action,
            options,
            provider,
            state: WorkerState::Uninitialized,
            backend_kind: None,
            meta: Meta::default(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Metadata of the latest chunk seen.
    pub fn current_meta(&self) -> &Meta {
        &self.meta
    }

    /// Backend picked for this worker; kept after `clean_up`.
    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend_kind
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(
            self.base.name(),
            self.action,
            self.backend_kind(),
            &self.base.downstream().counters(),
            self.started.elapsed(),
        )
    }

    /// Select the backend if none is chosen yet.
    fn initialize(&mut self) -> Result<(), FlateError> {
        if let WorkerState::Uninitialized = self.state {
            let backend = make_backend(self.action, &self.options, self.provider.as_ref(), self.base.downstream())?;
            self.backend_kind = Some(backend.kind());
            self.state = WorkerState::Initialized(backend);
        }
        Ok(())
    }

    /// Report a backend failure downstream and hand it back to the caller.
    fn fail(&self, err: FlateError) -> FlateError {
        self.base.error(err.clone());
        err
    }
}

impl ChunkWorker for FlateWorker {
    fn process_chunk(&mut self, chunk: Chunk) -> Result<(), FlateError> {
        match self.state {
            WorkerState::CleanedUp => return Err(FlateError::MissingBackend { operation: "process_chunk" }),
            WorkerState::Flushed(_) => return Err(FlateError::Finished { operation: "process_chunk" }),
            WorkerState::Uninitialized | WorkerState::Initialized(_) => {}
        }

        self.meta = chunk.meta;
        self.initialize().map_err(|e| self.fail(e))?;

        tracing::trace!(worker = %self.base.name(), len = chunk.data.len(), "processing chunk");
        self.base.downstream().record_input(&chunk.data);

        let WorkerState::Initialized(backend) = &mut self.state else {
            return Err(FlateError::MissingBackend { operation: "process_chunk" });
        };
        if let Err(e) = backend.ingest(chunk.data, &self.meta) {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FlateError> {
        if let WorkerState::CleanedUp = self.state {
            return Err(FlateError::MissingBackend { operation: "flush" });
        }
        // A flush whose backend cannot be built leaves the worker unflushed.
        self.initialize().map_err(|e| self.fail(e))?;
        self.base.flush()?;

        tracing::trace!(worker = %self.base.name(), "flushing");

        let mut backend = match std::mem::replace(&mut self.state, WorkerState::Uninitialized) {
            WorkerState::Initialized(backend) => backend,
            other => {
                self.state = other;
                return Err(FlateError::MissingBackend { operation: "flush" });
            }
        };
        let closed = backend.close();
        self.state = WorkerState::Flushed(backend);
        closed.map_err(|e| self.fail(e))
    }

    fn clean_up(&mut self) {
        match std::mem::replace(&mut self.state, WorkerState::CleanedUp) {
            // Output is still in flight: let the backend drain before detaching.
            WorkerState::Flushed(backend) => {
                drop(backend);
                self.base.clean_up();
            }
            other => {
                self.base.clean_up();
                drop(other);
            }
        }
    }

    fn pause(&mut self) -> bool {
        self.base.pause()
    }

    fn resume(&mut self) -> bool {
        self.base.resume()
    }
}

impl Drop for FlateWorker {
    fn drop(&mut self) {
        if !matches!(self.state, WorkerState::CleanedUp) {
            self.clean_up();
        }
    }
}
