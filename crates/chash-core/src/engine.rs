use sha2::{Digest, Sha256};
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::digest::{Sha256Digest, DIGEST_LEN};
use crate::metrics::throughput_mib_per_sec;

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Called with `(processed_bytes, total_bytes)` on the hashing thread.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

pub type HashOutcome = Result<HashedFile, HashError>;

#[derive(Clone)]
pub struct HashRequest {
    pub path: PathBuf,
    pub cancel: Option<Arc<AtomicBool>>,
    pub progress: Option<ProgressFn>,
    pub chunk_size: usize,
}

impl HashRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cancel: None,
            progress: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_progress(mut self, cb: ProgressFn) -> Self {
        self.progress = Some(cb);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn report(&self, processed: u64, total: u64) {
        if let Some(cb) = &self.progress {
            cb(processed, total);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashedFile {
    pub digest: Sha256Digest,
    /// Size observed right after open; not re-checked while streaming.
    pub size_bytes: u64,
    pub elapsed_seconds: f64,
}

impl HashedFile {
    pub fn throughput_mib_per_sec(&self) -> f64 {
        throughput_mib_per_sec(self.size_bytes, self.elapsed_seconds)
    }
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to open file {}: {source}", .path.display())]
    OpenFailed { path: PathBuf, source: io::Error },

    #[error("failed to get file size: {0}")]
    SizeQueryFailed(#[source] io::Error),

    #[error("read failed after {processed} bytes: {source}")]
    ReadFailed { processed: u64, source: io::Error },

    #[error("cancelled after {processed} bytes")]
    Cancelled { processed: u64 },
}

impl HashError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HashError::Cancelled { .. })
    }
}

/// Stream `req.path` through SHA-256 one chunk at a time.
///
/// Chunk size is clamped to `1..=MAX_CHUNK_SIZE`. The cancel flag is polled
/// once per chunk, before each read. The file handle
/// and hasher are dropped on every return path.
pub fn compute_digest(req: &HashRequest) -> HashOutcome {
    let mut file = File::open(&req.path).map_err(|source| {
        warn!(path = %req.path.display(), error = %source, "open failed");
        HashError::OpenFailed {
            path: req.path.clone(),
            source,
        }
    })?;

    let total = file
        .metadata()
        .map_err(|e| {
            warn!(path = %req.path.display(), error = %e, "metadata failed");
            HashError::SizeQueryFailed(e)
        })?
        .len();

    debug!(path = %req.path.display(), size = total, chunk = req.chunk_size, "hashing");

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; req.chunk_size.clamp(1, MAX_CHUNK_SIZE)];
    let mut processed: u64 = 0;

    req.report(0, total);

    let started = Instant::now();

    loop {
        if req.cancelled() {
            info!(path = %req.path.display(), processed, "hash cancelled");
            return Err(HashError::Cancelled { processed });
        }

        let n = match read_chunk(&mut file, &mut buf) {
            Ok(n) => n,
            Err(source) => {
                warn!(path = %req.path.display(), processed, error = %source, "read failed");
                return Err(HashError::ReadFailed { processed, source });
            }
        };
        if n == 0 {
            break;
        }

        hasher.update(&buf[..n]);
        processed += n as u64;
        req.report(processed, total);
    }

    let bytes: [u8; DIGEST_LEN] = hasher.finalize().into();
    let elapsed_seconds = started.elapsed().as_secs_f64();

    debug!(path = %req.path.display(), processed, elapsed_seconds, "hash finished");

    Ok(HashedFile {
        digest: Sha256Digest::from_bytes(bytes),
        size_bytes: total,
        elapsed_seconds,
    })
}

pub fn sha256_file(path: &Path) -> HashOutcome {
    compute_digest(&HashRequest::new(path))
}

fn read_chunk(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match file.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
