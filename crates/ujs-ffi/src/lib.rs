//! C ABI for the UnleashedJS native runtime.
//!
//! Exposes reference-counted objects behind opaque `u64` handles plus the
//! stateless runtime utilities. Every entry point is wrapped in a panic
//! guard so that a Rust panic surfaces as [`UjsStatus::Panicked`] instead
//! of unwinding into C.
//!
//! Object handles live in a per-thread table: a handle is meaningful only
//! on the thread that created it. `0` is the null handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, mapping a caught panic to a fallback return value.
///
/// With a single block the fallback is `UjsStatus::Panicked as i32`.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard!($crate::status::UjsStatus::Panicked as i32; $body)
    };
    ($fallback:expr; $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => {
                log::error!("panic caught at FFI boundary");
                $fallback
            }
        }
    };
}

mod buffer;
mod handle;
pub mod object;
pub mod runtime;
pub mod status;

pub use handle::NULL_HANDLE;
pub use status::UjsStatus;
