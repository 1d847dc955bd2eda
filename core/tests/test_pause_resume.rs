#[cfg(test)]
mod pause_resume_tests {
    use crossbeam::channel;

    use flate_worker::compression::{Action, FlateOptions};
    use flate_worker::types::{Chunk, FlateError, Meta};
    use flate_worker::worker::{collect_output, ChunkWorker, Downstream, FlateWorker, GenericWorker, WorkerEvent};

    // 1️⃣ paused events are held, then released in order
    #[test]
    fn pause_holds_until_resume() {
        let (tx, rx) = channel::unbounded();
        let opts = FlateOptions { chunk_size: Some(64), ..FlateOptions::software_only() };
        let mut worker = FlateWorker::new(Action::Compress, opts, tx);

        assert!(worker.pause());
        assert!(!worker.pause(), "second pause is a no-op");

        worker.process_chunk(Chunk::new(vec![1u8; 10_000], Meta::new())).unwrap();
        worker.flush().unwrap();
        assert!(rx.try_recv().is_err(), "nothing may leave while paused");

        assert!(worker.resume());
        assert!(!worker.resume());
        let out = collect_output(&rx).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn held_order_is_push_order() {
        let (tx, rx) = channel::unbounded();
        let downstream = Downstream::new(Action::Compress, tx);
        downstream.pause();
        for i in 0..5 {
            downstream.push(Chunk::new(vec![i], Meta::new()));
        }
        downstream.end();
        assert!(downstream.is_paused());
        assert!(downstream.is_terminated());
        downstream.resume();

        let data: Vec<u8> = collect_output(&rx).unwrap().iter().map(|c| c.data[0]).collect();
        assert_eq!(data, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn clean_up_while_paused_discards_held_events() {
        let (tx, rx) = channel::unbounded();
        let mut worker = FlateWorker::new(Action::Compress, FlateOptions::software_only(), tx);
        worker.pause();
        worker.process_chunk(Chunk::new(&b"held"[..], Meta::new())).unwrap();
        worker.flush().unwrap();
        worker.clean_up();

        assert!(matches!(collect_output(&rx), Err(FlateError::Disconnected)));
    }

    // 2️⃣ terminal events are single
    #[test]
    fn only_first_terminal_event_is_sent() {
        let (tx, rx) = channel::unbounded();
        let downstream = Downstream::new(Action::Decompress, tx);
        downstream.end();
        downstream.error(FlateError::Disconnected);
        downstream.push(Chunk::new(&b"late"[..], Meta::new()));
        downstream.end();
        drop(downstream);

        let events: Vec<WorkerEvent> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WorkerEvent::End));
    }

    #[test]
    fn generic_worker_tracks_lifecycle() {
        let (tx, rx) = channel::unbounded();
        let mut base = GenericWorker::new("base", Action::Compress, tx);
        assert_eq!(base.name(), "base");
        assert!(!base.is_finished());

        base.push(Chunk::new(&b"x"[..], Meta::new()));
        base.flush().unwrap();
        assert!(base.is_finished());
        assert!(matches!(base.flush(), Err(FlateError::AlreadyFlushed)));

        base.error(FlateError::Config("boom".into()));
        base.clean_up();
        assert!(base.is_cleaned_up());

        assert!(matches!(collect_output(&rx), Err(FlateError::Config(_))));
    }
}
