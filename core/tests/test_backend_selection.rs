#[cfg(test)]
mod backend_selection_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crossbeam::channel;

    use flate_worker::compression::{
        formats, Action, CompressionError, DisabledStreams, DuplexStream, FlateOptions, NativeStreams, StreamProvider,
    };
    use flate_worker::types::{Chunk, Meta};
    use flate_worker::worker::{collect_bytes, collect_output, make_backend, BackendKind, ChunkWorker, Downstream, FlateWorker};

    /// Counts probes and the formats they asked for.
    #[derive(Default)]
    struct CountingProvider {
        opened: AtomicUsize,
        disabled: bool,
    }

    impl StreamProvider for CountingProvider {
        fn open(&self, action: Action, format: &str) -> Result<DuplexStream, CompressionError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            assert_eq!(format, formats::DEFLATE_RAW);
            if self.disabled {
                return DisabledStreams.open(action, format);
            }
            NativeStreams.open(action, format)
        }
    }

    // 1️⃣ one probe per worker, however many chunks arrive
    #[test]
    fn backend_is_selected_once() {
        for disabled in [false, true] {
            let provider = Arc::new(CountingProvider { disabled, ..CountingProvider::default() });
            let (tx, rx) = channel::unbounded();
            let mut worker = FlateWorker::with_stream_provider(
                Action::Compress,
                FlateOptions::default(),
                tx,
                provider.clone(),
            );
            assert_eq!(provider.opened.load(Ordering::SeqCst), 0, "construction must not probe");

            for i in 0..10 {
                worker.process_chunk(Chunk::new(vec![i as u8; 1000], Meta::new())).unwrap();
            }
            worker.flush().unwrap();
            collect_output(&rx).unwrap();
            worker.clean_up();

            assert_eq!(provider.opened.load(Ordering::SeqCst), 1);
            let expected = if disabled { BackendKind::Software } else { BackendKind::Stream };
            assert_eq!(worker.backend_kind(), Some(expected));
        }
    }

    #[test]
    fn disabled_streams_fall_back_to_software() {
        let (tx, _rx) = channel::unbounded();
        let backend = make_backend(
            Action::Decompress,
            &FlateOptions::default(),
            &DisabledStreams,
            &Downstream::new(Action::Decompress, tx),
        )
        .unwrap();
        assert_eq!(backend.kind(), BackendKind::Software);
    }

    #[test]
    fn native_streams_are_preferred() {
        let (tx, _rx) = channel::unbounded();
        let backend = make_backend(
            Action::Compress,
            &FlateOptions::default(),
            &NativeStreams,
            &Downstream::new(Action::Compress, tx),
        )
        .unwrap();
        assert_eq!(backend.kind(), BackendKind::Stream);
    }

    #[test]
    fn native_streams_option_false_skips_the_probe() {
        let (tx, rx) = channel::unbounded();
        let mut worker = FlateWorker::new(Action::Compress, FlateOptions::software_only(), tx);
        worker.process_chunk(Chunk::new(&b"abc"[..], Meta::new())).unwrap();
        assert_eq!(worker.backend_kind(), Some(BackendKind::Software));
        worker.flush().unwrap();
        assert!(!collect_bytes(&rx).unwrap().is_empty());
    }

    fn pseudo_random(len: usize, mut seed: u32) -> Vec<u8> {
        (0..len)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                seed as u8
            })
            .collect()
    }

    // 2️⃣ outputs carry the latest metadata the backend had consumed
    #[test]
    fn output_metadata_is_never_stale() {
        for native in [true, false] {
            let opts = FlateOptions {
                chunk_size: Some(1024),
                native_streams: Some(native),
                ..FlateOptions::default()
            };
            let (tx, rx) = channel::unbounded();
            let mut worker = FlateWorker::new(Action::Compress, opts, tx);

            let metas: Vec<Meta> = (0..4).map(|i| Meta::new().with("entry", i)).collect();
            for (i, meta) in metas.iter().enumerate() {
                worker.process_chunk(Chunk::new(pseudo_random(8 * 1024, i as u32 + 1), meta.clone())).unwrap();
            }
            assert_eq!(worker.current_meta(), &metas[3]);
            worker.flush().unwrap();

            let out = collect_output(&rx).unwrap();
            worker.clean_up();

            let seen: Vec<i64> = out
                .iter()
                .map(|c| c.meta.get("entry").and_then(|v| v.as_i64()).unwrap())
                .collect();
            assert!(seen.windows(2).all(|w| w[0] <= w[1]), "metadata went backwards: {seen:?}");
            assert_eq!(seen.last(), Some(&3), "native_streams = {native}");
        }
    }
}
