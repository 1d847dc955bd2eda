#[cfg(test)]
mod pipeline_tests {
    use std::io::Read;

    use crossbeam::channel;
    use flate2::read::DeflateDecoder;

    use flate_worker::compression::{Action, CompressionError, FlateOptions};
    use flate_worker::types::{Chunk, FlateError, Meta};
    use flate_worker::utils::chunks_to_bytes;
    use flate_worker::worker::{collect_output, run_flate_worker, spawn_flate_worker, FlateWorker, WorkerEvent};

    // 1️⃣ channel in, channel out, on a worker thread
    #[test]
    fn spawned_worker_drains_channel() {
        for native in [true, false] {
            let (in_tx, in_rx) = channel::unbounded();
            let (out_tx, out_rx) = channel::unbounded();
            let opts = FlateOptions { native_streams: Some(native), ..FlateOptions::default() };
            let handle = spawn_flate_worker(Action::Compress, opts, in_rx, out_tx).unwrap();

            for line in ["alpha\n", "beta\n", "gamma\n"] {
                in_tx.send(Chunk::new(line.as_bytes().to_vec(), Meta::new().with("line", line))).unwrap();
            }
            drop(in_tx);

            let out = collect_output(&out_rx).unwrap();
            let snap = handle.join().unwrap().unwrap();
            assert_eq!(snap.chunks_in, 3);

            let mut plain = String::new();
            DeflateDecoder::new(&chunks_to_bytes(&out)[..]).read_to_string(&mut plain).unwrap();
            assert_eq!(plain, "alpha\nbeta\ngamma\n");
        }
    }

    #[test]
    fn loop_stops_on_first_error() {
        let (in_tx, in_rx) = channel::unbounded();
        let (out_tx, out_rx) = channel::unbounded();
        let worker = FlateWorker::new(Action::Compress, FlateOptions { level: Some(11), ..FlateOptions::software_only() }, out_tx);

        in_tx.send(Chunk::new(&b"never compressed"[..], Meta::new())).unwrap();
        drop(in_tx);

        let res = run_flate_worker(in_rx, worker);
        assert!(matches!(res, Err(FlateError::Compression(CompressionError::InvalidLevel { level: 11 }))));
        assert!(matches!(collect_output(&out_rx), Err(FlateError::Compression(_))));
    }

    #[test]
    fn empty_input_channel_still_ends() {
        let (in_tx, in_rx) = channel::unbounded::<Chunk>();
        let (out_tx, out_rx) = channel::unbounded();
        drop(in_tx);

        let snap = run_flate_worker(in_rx, FlateWorker::new(Action::Decompress, FlateOptions::default(), out_tx)).unwrap();
        assert_eq!(snap.chunks_in, 0);
        assert!(collect_output(&out_rx).unwrap().is_empty());
    }

    #[test]
    fn collect_reports_disconnect() {
        let (tx, rx) = channel::unbounded::<WorkerEvent>();
        tx.send(WorkerEvent::Data(Chunk::new(&b"partial"[..], Meta::new()))).unwrap();
        drop(tx);
        assert!(matches!(collect_output(&rx), Err(FlateError::Disconnected)));
    }
}
