//! Stateless runtime utilities FFI: greeting, system info, fast math,
//! cycle counter, lifecycle demo.

use std::ffi::CStr;
use std::os::raw::c_char;

use ujs_core::math::fast_math_code;
use ujs_core::{cpu_cycles, perform_low_level_demo, system_info, RuntimeConfig};

use crate::buffer::copy_out;

static HELLO: &CStr = c"Hello from UnleashedJS C runtime!";

/// Static greeting string. Never null; must not be freed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_hello_from_c() -> *const c_char {
    HELLO.as_ptr()
}

/// Copy the runtime/platform description plus a NUL terminator into `buf`.
///
/// Same buffer contract as `ujs_object_get_data`: `len_out` (may be null)
/// receives the text length, also on `UJS_STATUS_BUFFER_TOO_SMALL`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_get_system_info(buf: *mut u8, cap: usize, len_out: *mut usize) -> i32 {
    ffi_guard!({
        let info = system_info(&RuntimeConfig::default());
        copy_out(info.as_bytes(), buf, cap, len_out)
    })
}

/// Apply operation `op` (0 add, 1 subtract, 2 multiply, 3 divide) to `a`
/// and `b`. Division by zero and unknown `op` return `0.0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_fast_math_operation(a: f64, b: f64, op: i32) -> f64 {
    fast_math_code(a, b, op)
}

/// CPU time-stamp counter, or `0` where unsupported.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_get_cpu_cycles() -> u64 {
    cpu_cycles()
}

/// Run the create / retain ×2 / release ×3 demo. Returns `0` on success,
/// `-1` if the object could not be created or was not freed at the end.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_perform_low_level_demo() -> i32 {
    ffi_guard!(-1; {
        match perform_low_level_demo() {
            Ok(trace) if trace.freed() => 0,
            Ok(_) => -1,
            Err(e) => {
                log::error!("low-level demo failed: {e}");
                -1
            }
        }
    })
}
