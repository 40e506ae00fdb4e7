//! Benchmark payloads for the UnleashedJS runtime.
//!
//! - [`payload`]: deterministic byte payload of a given size
//! - [`PAYLOAD_SIZES`]: sizes swept by the object benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Payload sizes (bytes) swept by the create and read benchmarks.
pub const PAYLOAD_SIZES: [usize; 4] = [0, 32, 1024, 64 * 1024];

/// Deterministic payload of `len` bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
