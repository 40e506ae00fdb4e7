//! C-compatible status codes.
//!
//! [`UjsStatus`] is a `repr(i32)` enum returned by every status-returning
//! FFI function. Conversions from core error types are provided.

use ujs_core::HandleError;

/// C-compatible status code.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UjsStatus {
    /// Success.
    Ok = 0,
    /// Handle is stale, was never issued, or its object was already freed.
    InvalidHandle = -1,
    /// Object payload allocation failed.
    AllocationFailed = -2,
    /// A required pointer is null or an argument is otherwise invalid.
    InvalidArgument = -3,
    /// Caller-provided buffer is too small; the required length was still
    /// reported.
    BufferTooSmall = -4,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&HandleError> for UjsStatus {
    fn from(e: &HandleError) -> Self {
        match e {
            HandleError::AllocationFailed { .. } => UjsStatus::AllocationFailed,
        }
    }
}
