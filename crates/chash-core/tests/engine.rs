use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chash_core::engine::{compute_digest, sha256_file, HashError, HashRequest, DEFAULT_CHUNK_SIZE};
use sha2::{Digest, Sha256};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn write_temp(content: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(content).expect("write temp file");
    f.flush().expect("flush temp file");
    f
}

fn reference(content: &[u8]) -> [u8; 32] {
    Sha256::digest(content).into()
}

#[test]
fn matches_one_shot_sha256() {
    let content = pattern(3 * DEFAULT_CHUNK_SIZE + 17);
    let f = write_temp(&content);

    let out = sha256_file(f.path()).unwrap();

    assert_eq!(out.digest.as_bytes(), &reference(&content));
    assert_eq!(out.size_bytes, content.len() as u64);
}

#[test]
fn digest_is_independent_of_chunk_size() {
    let content = pattern(64 * 1024 + 5);
    let f = write_temp(&content);
    let expected = reference(&content);

    for chunk in [1usize, 1024, DEFAULT_CHUNK_SIZE] {
        let out = compute_digest(&HashRequest::new(f.path()).with_chunk_size(chunk)).unwrap();
        assert_eq!(out.digest.as_bytes(), &expected, "chunk size {chunk}");
    }
}

#[test]
fn hashing_twice_is_deterministic() {
    let f = write_temp(&pattern(10_000));
    let a = sha256_file(f.path()).unwrap();
    let b = sha256_file(f.path()).unwrap();
    assert_eq!(a.digest, b.digest);
    assert_eq!(a.size_bytes, b.size_bytes);
}

#[test]
fn progress_is_monotonic_and_ends_at_total() {
    let content = pattern(10 * 1000 + 123);
    let f = write_temp(&content);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let req = HashRequest::new(f.path())
        .with_chunk_size(1000)
        .with_progress(Arc::new(move |p: u64, t: u64| sink.lock().unwrap().push((p, t))));

    compute_digest(&req).unwrap();

    let seen = seen.lock().unwrap();
    let total = content.len() as u64;
    assert_eq!(seen.first(), Some(&(0, total)));
    assert_eq!(seen.last(), Some(&(total, total)));
    // initial report + 11 chunks
    assert_eq!(seen.len(), 12);
    assert!(seen.iter().all(|&(_, t)| t == total));
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[test]
fn cancel_partway_releases_the_file() {
    let content = pattern(50 * 4096);
    let f = write_temp(&content);
    let total = content.len() as u64;

    let flag = Arc::new(AtomicBool::new(false));
    let trip = flag.clone();
    let last = Arc::new(Mutex::new(0u64));
    let last_sink = last.clone();
    let req = HashRequest::new(f.path())
        .with_chunk_size(4096)
        .with_cancel(flag)
        .with_progress(Arc::new(move |p: u64, _: u64| {
            *last_sink.lock().unwrap() = p;
            if p >= 3 * 4096 {
                trip.store(true, Ordering::Relaxed);
            }
        }));

    let err = compute_digest(&req).unwrap_err();
    match err {
        HashError::Cancelled { processed } => {
            assert_eq!(processed, 3 * 4096);
            assert!(processed < total);
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(*last.lock().unwrap(), 3 * 4096);

    let again = sha256_file(f.path()).unwrap();
    assert_eq!(again.digest.as_bytes(), &reference(&content));
}

#[test]
fn cancel_from_another_thread() {
    let content = pattern(256 * 1024);
    let f = write_temp(&content);
    let path = f.path().to_path_buf();

    let flag = Arc::new(AtomicBool::new(false));
    let (tx, rx) = std::sync::mpsc::channel();
    let (resume_tx, resume_rx) = std::sync::mpsc::channel::<()>();
    let resume_rx = Mutex::new(resume_rx);

    let req = HashRequest::new(path)
        .with_chunk_size(1024)
        .with_cancel(flag.clone())
        .with_progress(Arc::new(move |p: u64, _: u64| {
            if p == 1024 {
                let _ = tx.send(());
                let _ = resume_rx.lock().unwrap().recv();
            }
        }));

    let worker = thread::spawn(move || compute_digest(&req));

    rx.recv().unwrap();
    flag.store(true, Ordering::Relaxed);
    resume_tx.send(()).unwrap();

    let err = worker.join().unwrap().unwrap_err();
    assert!(matches!(err, HashError::Cancelled { processed: 1024 }));
}

#[test]
fn concurrent_calls_on_different_files() {
    let files: Vec<_> = (0..4).map(|i| write_temp(&pattern(20_000 + i * 7))).collect();

    let handles: Vec<_> = files
        .iter()
        .map(|f| {
            let p = f.path().to_path_buf();
            thread::spawn(move || sha256_file(&p).map(|h| h.digest))
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        let got = h.join().unwrap().unwrap();
        assert_eq!(got.as_bytes(), &reference(&pattern(20_000 + i * 7)));
    }
}

#[test]
fn missing_path_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.bin");
    let err = sha256_file(&missing).unwrap_err();
    assert!(matches!(err, HashError::OpenFailed { .. }));
    assert!(err.to_string().contains("missing.bin"));
}

#[cfg(unix)]
#[test]
fn reading_a_directory_is_read_failed() {
    let dir = tempfile::tempdir().unwrap();
    let err = sha256_file(dir.path()).unwrap_err();
    assert!(matches!(err, HashError::ReadFailed { processed: 0, .. }));
    assert!(!err.is_cancelled());
}
