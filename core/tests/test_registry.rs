#[cfg(test)]
mod registry_tests {
    use crossbeam::channel;

    use flate_worker::compression::{compress_worker, method_by_magic, uncompress_worker, Action, FlateOptions, DEFLATE};
    use flate_worker::types::{Chunk, Meta};
    use flate_worker::worker::{collect_bytes, ChunkWorker};

    #[test]
    fn deflate_is_found_by_magic() {
        assert_eq!(DEFLATE.magic, [0x08, 0x00]);
        assert_eq!(DEFLATE.name, "DEFLATE");
        assert_eq!(method_by_magic([0x08, 0x00]), Some(&DEFLATE));
        assert_eq!(method_by_magic([0x00, 0x00]), None);
        assert_eq!(method_by_magic([0x0c, 0x00]), None);
    }

    #[test]
    fn factories_build_matching_workers() {
        let (tx, rx) = channel::unbounded();
        let mut deflate = compress_worker(FlateOptions::new(Some(9)), tx);
        assert_eq!(deflate.action(), Action::Compress);
        deflate.process_chunk(Chunk::new(&b"entry contents"[..], Meta::new())).unwrap();
        deflate.flush().unwrap();
        let compressed = collect_bytes(&rx).unwrap();

        let (tx, rx) = channel::unbounded();
        let method = method_by_magic(DEFLATE.magic).unwrap();
        let mut inflate = method.uncompress_worker(tx);
        assert_eq!(inflate.action(), Action::Decompress);
        inflate.process_chunk(Chunk::new(compressed, Meta::new())).unwrap();
        inflate.flush().unwrap();
        assert_eq!(collect_bytes(&rx).unwrap(), b"entry contents");
    }

    #[test]
    fn method_factories_delegate() {
        let (tx, _rx) = channel::unbounded();
        assert_eq!(DEFLATE.compress_worker(FlateOptions::default(), tx.clone()).action(), Action::Compress);
        assert_eq!(uncompress_worker(tx).name(), "FlateWorker/Inflate");
    }
}
