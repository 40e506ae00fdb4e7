//! Platform cycle counter.

/// Read the CPU time-stamp counter.
///
/// Observational only. Returns `0` on architectures without a supported
/// counter.
#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
pub fn cpu_cycles() -> u64 {
    // SAFETY: `rdtsc` is part of the x86_64 baseline and touches no memory.
    unsafe { core::arch::x86_64::_rdtsc() }
}

/// Read the CPU time-stamp counter.
///
/// Observational only. Returns `0` on architectures without a supported
/// counter.
#[cfg(not(target_arch = "x86_64"))]
pub fn cpu_cycles() -> u64 {
    0
}
