//! compression/registry.rs
//! Archive compression-method descriptors and worker factories.

use crossbeam::channel::Sender;

use crate::compression::types::{Action, FlateOptions};
use crate::constants::MAGIC_DEFLATE;
use crate::worker::{FlateWorker, WorkerEvent};

/// A compression method as recorded in an archive entry header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionMethod {
    pub magic: [u8; 2],
    pub name: &'static str,
}

pub const DEFLATE: CompressionMethod = CompressionMethod {
    magic: MAGIC_DEFLATE,
    name: "DEFLATE",
};

const METHODS: &[CompressionMethod] = &[DEFLATE];

impl CompressionMethod {
    pub fn compress_worker(&self, options: FlateOptions, tx: Sender<WorkerEvent>) -> FlateWorker {
        compress_worker(options, tx)
    }

    pub fn uncompress_worker(&self, tx: Sender<WorkerEvent>) -> FlateWorker {
        uncompress_worker(tx)
    }
}

pub fn compress_worker(options: FlateOptions, tx: Sender<WorkerEvent>) -> FlateWorker {
    FlateWorker::new(Action::Compress, options, tx)
}

/// Inflate needs no level; default options apply.
pub fn uncompress_worker(tx: Sender<WorkerEvent>) -> FlateWorker {
    FlateWorker::new(Action::Decompress, FlateOptions::default(), tx)
}

pub fn method_by_magic(magic: [u8; 2]) -> Option<&'static CompressionMethod> {
    METHODS.iter().find(|m| m.magic == magic)
}
