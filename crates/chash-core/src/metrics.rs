const MIB: f64 = 1024.0 * 1024.0;

/// MiB per second; 0.0 when no measurable time elapsed.
pub fn throughput_mib_per_sec(size_bytes: u64, elapsed_seconds: f64) -> f64 {
    if elapsed_seconds > 0.0 {
        (size_bytes as f64 / MIB) / elapsed_seconds
    } else {
        0.0
    }
}

pub fn elapsed_millis(elapsed_seconds: f64) -> u64 {
    (elapsed_seconds * 1000.0).round().max(0.0) as u64
}
