use super::*;

#[test]
fn forwarder_sends_non_empty_lines_on_drop() {
    let (tx, rx) = mpsc::channel();
    {
        let mut forwarder = LineForwarder {
            pending: Vec::new(),
            tx,
        };
        forwarder.write_all(b"INFO first line\n").unwrap();
        forwarder.write_all(b"\n  \nsecond").unwrap();
        assert!(rx.try_recv().is_err());
    }
    let lines: Vec<String> = rx.try_iter().collect();
    assert_eq!(lines, vec!["INFO first line", "second"]);
}

#[test]
fn forwarder_without_output_sends_nothing() {
    let (tx, rx) = mpsc::channel();
    drop(LineForwarder {
        pending: Vec::new(),
        tx,
    });
    assert!(rx.try_recv().is_err());
}

#[test]
fn init_in_writes_into_the_given_directory() {
    let dir = tempfile::tempdir().unwrap();
    let Some(mut guard) = init_in(dir.path(), Some("boxcode=debug")) else {
        // Another test binary component already owns the global subscriber.
        return;
    };
    assert_eq!(guard.log_dir(), dir.path());

    let lines = guard.take_lines().expect("feed available once");
    assert!(guard.take_lines().is_none());

    let first: Vec<String> = lines.try_iter().collect();
    assert!(first.iter().any(|l| l.contains("logging initialized")));
}
