use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;

use crate::compression::{Action, FlateOptions, SoftwareCodec, SoftwareCodecOptions};
use crate::types::{Chunk, FlateError, Meta};
use crate::worker::generic::Downstream;
use crate::worker::types::{BackendKind, FlateBackend};

/// Fallback backend: the push-based software codec, run synchronously.
pub struct SoftwareCodecBackend {
    codec: SoftwareCodec,
    current_meta: Arc<Mutex<Meta>>,
    downstream: Downstream,
}

impl SoftwareCodecBackend {
    pub fn new(action: Action, options: &FlateOptions, downstream: Downstream) -> Result<Self, FlateError> {
        let mut codec = SoftwareCodec::new(
            action,
            SoftwareCodecOptions {
                chunk_size: options.chunk_size()?,
                level: options.level()?,
            },
        )?;

        let current_meta = Arc::new(Mutex::new(Meta::default()));
        let meta = current_meta.clone();
        let out = downstream.clone();
        codec.set_on_data(Box::new(move |data: Bytes| {
            let meta = meta.lock().unwrap_or_else(PoisonError::into_inner).clone();
            out.push(Chunk { data, meta });
        }));

        Ok(Self { codec, current_meta, downstream })
    }

    fn set_meta(&self, meta: &Meta) {
        *self.current_meta.lock().unwrap_or_else(PoisonError::into_inner) = meta.clone();
    }
}

impl FlateBackend for SoftwareCodecBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn ingest(&mut self, data: Bytes, meta: &Meta) -> Result<(), FlateError> {
        self.set_meta(meta);
        self.codec.push(&data, false)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), FlateError> {
        self.codec.push(&[], true)?;
        self.downstream.end();
        Ok(())
    }
}
