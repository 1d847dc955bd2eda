//! Chained flate worker.
//!
//! Responsibilities:
//! - Pick one backend lazily (duplex stream first, software codec otherwise)
//! - Relay backend output downstream in order, tagged with current metadata
//! - Drive flush and teardown across both backends
//!
//! Non-responsibilities:
//! - The deflate algorithm itself
//! - Archive container parsing

pub mod types;
pub mod generic;
pub mod worker_stream;
pub mod worker_software;
pub mod worker;
pub mod pipeline;

pub use types::{
    BackendKind,
    ChunkWorker,
    FlateBackend,
    WorkerEvent,
};
pub use generic::{
    Downstream,
    GenericWorker,
};
pub use worker::{
    make_backend,
    FlateWorker,
};
pub use worker_stream::{
    StreamBackend
};
pub use worker_software::{
    SoftwareCodecBackend
};
pub use pipeline::{
    collect_bytes,
    collect_output,
    run_flate_worker,
    spawn_flate_worker,
};
