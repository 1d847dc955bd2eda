//! worker/generic.rs
//! Base worker contract shared by every chained worker.
//!
//! Responsibilities:
//! - Deliver `WorkerEvent`s to the downstream channel in push order
//! - Hold events while paused, release them on resume
//! - Guarantee a single terminal event (`End` or `Error`)
//! - Count bytes for telemetry
//!
//! Non-responsibilities:
//! - Codecs
//! - Backend selection

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam::channel::Sender;

use crate::compression::Action;
use crate::telemetry::WorkerCounters;
use crate::types::{Chunk, FlateError};
use crate::worker::types::WorkerEvent;

struct DownstreamState {
    tx: Option<Sender<WorkerEvent>>,
    action: Action,
    paused: bool,
    held: VecDeque<WorkerEvent>,
    counters: WorkerCounters,
    terminated: bool,
}

impl DownstreamState {
    fn emit(&mut self, event: WorkerEvent) {
        if self.paused {
            self.held.push_back(event);
        } else {
            self.send(event);
        }
    }

    fn send(&mut self, event: WorkerEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(event).is_err() {
            tracing::debug!("downstream receiver dropped");
            self.tx = None;
        }
    }
}

/// Push side of a worker. Clones share state, so a backend's relay thread
/// and the worker itself feed the same ordered channel.
#[derive(Clone)]
pub struct Downstream {
    shared: Arc<Mutex<DownstreamState>>,
}

impl Downstream {
    pub fn new(action: Action, tx: Sender<WorkerEvent>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(DownstreamState {
                tx: Some(tx),
                action,
                paused: false,
                held: VecDeque::new(),
                counters: WorkerCounters::default(),
                terminated: false,
            })),
        }
    }

    // Critical sections are plain field updates, so a poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, DownstreamState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, chunk: Chunk) {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.terminated {
            tracing::trace!(len = chunk.data.len(), "dropping chunk after end of stream");
            return;
        }
        state.counters.add_output(state.action, &chunk.data);
        state.emit(WorkerEvent::Data(chunk));
    }

    /// Report a failure. Only the first terminal event reaches the channel.
    pub fn error(&self, err: FlateError) {
        let mut state = self.lock();
        if state.terminated {
            tracing::debug!(error = %err, "dropping error after end of stream");
            return;
        }
        state.terminated = true;
        state.emit(WorkerEvent::Error(err));
    }

    pub fn end(&self) {
        let mut state = self.lock();
        if state.terminated {
            return;
        }
        state.terminated = true;
        state.emit(WorkerEvent::End);
    }

    pub fn record_input(&self, data: &[u8]) {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.counters.add_input(state.action, data);
    }

    /// Returns `false` when already paused.
    pub fn pause(&self) -> bool {
        let mut state = self.lock();
        if state.paused {
            return false;
        }
        state.paused = true;
        true
    }

    /// Returns `false` when not paused. Held events go out in order.
    pub fn resume(&self) -> bool {
        let mut state = self.lock();
        if !state.paused {
            return false;
        }
        state.paused = false;
        while let Some(event) = state.held.pop_front() {
            state.send(event);
        }
        true
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_terminated(&self) -> bool {
        self.lock().terminated
    }

    pub fn counters(&self) -> WorkerCounters {
        self.lock().counters.clone()
    }

    /// Drop the channel and anything still held.
    pub fn detach(&self) {
        let mut state = self.lock();
        if !state.held.is_empty() {
            tracing::debug!(held = state.held.len(), "discarding held events on detach");
        }
        state.held.clear();
        state.tx = None;
    }
}

pub struct GenericWorker {
    name: String,
    downstream: Downstream,
    finished: bool,
    cleaned_up: bool,
}

impl GenericWorker {
    pub fn new(name: impl Into<String>, action: Action, tx: Sender<WorkerEvent>) -> Self {
        Self {
            name: name.into(),
            downstream: Downstream::new(action, tx),
            finished: false,
            cleaned_up: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn downstream(&self) -> &Downstream {
        &self.downstream
    }

    pub fn push(&self, chunk: Chunk) {
        self.downstream.push(chunk);
    }

    pub fn error(&self, err: FlateError) {
        tracing::debug!(worker = %self.name, error = %err, "worker error");
        self.downstream.error(err);
    }

    /// Mark end of input. A second flush is an error.
    pub fn flush(&mut self) -> Result<(), FlateError> {
        if self.finished {
            return Err(FlateError::AlreadyFlushed);
        }
        self.finished = true;
        Ok(())
    }

    pub fn clean_up(&mut self) {
        self.cleaned_up = true;
        self.downstream.detach();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.cleaned_up
    }

    pub fn pause(&mut self) -> bool {
        self.downstream.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.downstream.resume()
    }
}
