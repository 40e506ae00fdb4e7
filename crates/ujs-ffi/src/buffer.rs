//! Copy-out of byte strings into caller-provided buffers.

use crate::status::UjsStatus;

/// Copy `bytes` plus a NUL terminator into `buf`.
///
/// `len_out`, when non-null, always receives `bytes.len()` (terminator
/// excluded) so callers can size a retry after `BufferTooSmall`. A null
/// `buf` with `cap == 0` is a pure length query.
#[allow(unsafe_code)]
pub(crate) fn copy_out(bytes: &[u8], buf: *mut u8, cap: usize, len_out: *mut usize) -> i32 {
    if !len_out.is_null() {
        // SAFETY: len_out is valid per caller contract.
        unsafe { *len_out = bytes.len() };
    }
    if buf.is_null() && cap > 0 {
        return UjsStatus::InvalidArgument as i32;
    }
    if cap < bytes.len() + 1 {
        return UjsStatus::BufferTooSmall as i32;
    }
    // SAFETY: buf points to at least cap >= bytes.len() + 1 writable bytes.
    let out = unsafe { std::slice::from_raw_parts_mut(buf, cap) };
    out[..bytes.len()].copy_from_slice(bytes);
    out[bytes.len()] = 0;
    UjsStatus::Ok as i32
}
