use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::digest::Sha256Digest;
use crate::engine::HashedFile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub elapsed_seconds: f64,
    pub throughput_mib_per_sec: f64,
    pub sha256_hex: String,
    pub sha256_base64: String,
    pub uppercase_hex: bool,
    pub hashed_utc: String,
    #[serde(skip)]
    digest: Option<Sha256Digest>,
}

impl HashReport {
    pub fn new(path: impl Into<PathBuf>, hashed: &HashedFile, uppercase_hex: bool) -> Self {
        Self {
            path: path.into(),
            size_bytes: hashed.size_bytes,
            elapsed_seconds: hashed.elapsed_seconds,
            throughput_mib_per_sec: hashed.throughput_mib_per_sec(),
            sha256_hex: hashed.digest.to_hex(uppercase_hex),
            sha256_base64: hashed.digest.to_base64(),
            uppercase_hex,
            hashed_utc: now_utc(),
            digest: Some(hashed.digest),
        }
    }

    /// Re-render the hex field from the stored digest. No-op for reports
    /// loaded from JSON, which carry no digest.
    pub fn set_uppercase(&mut self, uppercase: bool) {
        if let Some(d) = &self.digest {
            self.sha256_hex = d.to_hex(uppercase);
            self.uppercase_hex = uppercase;
        }
    }
}

fn now_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
