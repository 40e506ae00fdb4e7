//! Object lifecycle FFI: create, retain, release, read.
//!
//! Each handle maps to one shared [`JsObject`] in a thread-local table.
//! The entry holds the creating owner plus one extra owner per
//! `ujs_object_retain`, so the core type keeps the count and frees the
//! payload. The last `ujs_object_release` removes the entry and retires the
//! handle; any later call with it returns `UJS_STATUS_INVALID_HANDLE`
//! without touching freed memory.

use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::c_char;

use ujs_core::{JsObject, Released, NULL_SENTINEL};

use crate::buffer::copy_out;
use crate::handle::{HandleTable, NULL_HANDLE};
use crate::status::UjsStatus;

struct ObjectEntry {
    owner: JsObject,
    retained: Vec<JsObject>,
}

thread_local! {
    /// Objects created on this thread.
    static OBJECTS: RefCell<HandleTable<ObjectEntry>> = const { RefCell::new(HandleTable::new()) };
}

fn with_objects<R>(f: impl FnOnce(&mut HandleTable<ObjectEntry>) -> R) -> R {
    OBJECTS.with(|cell| f(&mut cell.borrow_mut()))
}

#[allow(unsafe_code)]
fn insert_object(obj: JsObject, out: *mut u64) -> i32 {
    let handle = with_objects(|objects| {
        objects.insert(ObjectEntry {
            owner: obj,
            retained: Vec::new(),
        })
    });
    // SAFETY: out is valid per caller contract (checked non-null by callers).
    unsafe { *out = handle };
    UjsStatus::Ok as i32
}

/// Create an object holding a copy of `len` bytes at `data`.
///
/// `data` may be null only when `len == 0`. On success writes the new
/// handle (reference count 1) to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_create(data: *const u8, len: usize, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() || (data.is_null() && len > 0) {
            return UjsStatus::InvalidArgument as i32;
        }
        let bytes: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: data points to len readable bytes per caller contract.
            unsafe { std::slice::from_raw_parts(data, len) }
        };
        match JsObject::create(bytes) {
            Ok(obj) => insert_object(obj, out),
            Err(e) => UjsStatus::from(&e) as i32,
        }
    })
}

/// Create an object from a NUL-terminated string (terminator not stored).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_create_cstr(data: *const c_char, out: *mut u64) -> i32 {
    ffi_guard!({
        if data.is_null() || out.is_null() {
            return UjsStatus::InvalidArgument as i32;
        }
        // SAFETY: data is a valid NUL-terminated string per caller contract.
        let bytes = unsafe { CStr::from_ptr(data) }.to_bytes();
        match JsObject::create(bytes) {
            Ok(obj) => insert_object(obj, out),
            Err(e) => UjsStatus::from(&e) as i32,
        }
    })
}

/// Add one owner to an object. The null handle is a no-op.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_retain(handle: u64) -> i32 {
    ffi_guard!({
        if handle == NULL_HANDLE {
            return UjsStatus::Ok as i32;
        }
        let retained = with_objects(|objects| {
            let entry = objects.get_mut(handle)?;
            let extra = entry.owner.retain();
            entry.retained.push(extra);
            Some(())
        });
        match retained {
            Some(()) => UjsStatus::Ok as i32,
            None => {
                log::warn!("retain on invalid object handle {handle:#x}");
                UjsStatus::InvalidHandle as i32
            }
        }
    })
}

/// Give up one owner of an object. The null handle is a no-op.
///
/// The release that drops the last owner frees the object and retires the
/// handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_release(handle: u64) -> i32 {
    ffi_guard!({
        if handle == NULL_HANDLE {
            return UjsStatus::Ok as i32;
        }
        let outcome = with_objects(|objects| {
            let entry = objects.get_mut(handle)?;
            if let Some(extra) = entry.retained.pop() {
                return Some(extra.release());
            }
            objects.remove(handle).map(|entry| entry.owner.release())
        });
        match outcome {
            Some(Released::Freed) => {
                log::trace!("object handle {handle:#x} freed");
                UjsStatus::Ok as i32
            }
            Some(Released::Live { .. }) => UjsStatus::Ok as i32,
            None => {
                log::warn!("release on invalid object handle {handle:#x}");
                UjsStatus::InvalidHandle as i32
            }
        }
    })
}

/// Write the current reference count of an object to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_ref_count(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return UjsStatus::InvalidArgument as i32;
        }
        match with_objects(|objects| objects.get(handle).map(|e| e.owner.ref_count())) {
            Some(count) => {
                // SAFETY: out is valid per caller contract.
                unsafe { *out = count };
                UjsStatus::Ok as i32
            }
            None => UjsStatus::InvalidHandle as i32,
        }
    })
}

/// Copy an object's payload plus a NUL terminator into `buf`.
///
/// The null handle yields the sentinel `"null"`. `len_out` (may be null)
/// receives the payload length without the terminator, also when the call
/// returns `UJS_STATUS_BUFFER_TOO_SMALL`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_get_data(
    handle: u64,
    buf: *mut u8,
    cap: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if handle == NULL_HANDLE {
            return copy_out(NULL_SENTINEL, buf, cap, len_out);
        }
        let status = with_objects(|objects| {
            objects
                .get(handle)
                .map(|entry| copy_out(entry.owner.data(), buf, cap, len_out))
        });
        status.unwrap_or(UjsStatus::InvalidHandle as i32)
    })
}

/// Write the number of live objects on the calling thread to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ujs_object_live_count(out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return UjsStatus::InvalidArgument as i32;
        }
        let live = with_objects(|objects| objects.len());
        // SAFETY: out is valid per caller contract.
        unsafe { *out = live };
        UjsStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &[u8] = b"JavaScript object managed by C!";

    fn create(data: &[u8]) -> u64 {
        let mut h = NULL_HANDLE;
        let status = ujs_object_create(data.as_ptr(), data.len(), &mut h);
        assert_eq!(status, UjsStatus::Ok as i32);
        assert_ne!(h, NULL_HANDLE);
        h
    }

    fn ref_count(h: u64) -> Option<usize> {
        let mut count = 0usize;
        match ujs_object_ref_count(h, &mut count) {
            s if s == UjsStatus::Ok as i32 => Some(count),
            _ => None,
        }
    }

    fn get_data(h: u64) -> Result<Vec<u8>, i32> {
        let mut buf = vec![0u8; 256];
        let mut len = 0usize;
        let status = ujs_object_get_data(h, buf.as_mut_ptr(), buf.len(), &mut len);
        if status != UjsStatus::Ok as i32 {
            return Err(status);
        }
        assert_eq!(buf[len], 0, "payload must be NUL-terminated");
        buf.truncate(len);
        Ok(buf)
    }

    fn live() -> usize {
        let mut n = 0usize;
        assert_eq!(ujs_object_live_count(&mut n), UjsStatus::Ok as i32);
        n
    }

    #[test]
    fn demo_sequence_frees_on_third_release() {
        let h = create(DEMO);
        assert_eq!(ujs_object_retain(h), UjsStatus::Ok as i32);
        assert_eq!(ujs_object_retain(h), UjsStatus::Ok as i32);
        assert_eq!(ref_count(h), Some(3));

        assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
        assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
        assert_eq!(ref_count(h), Some(1));
        assert_eq!(get_data(h).unwrap(), DEMO);

        assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
        assert_eq!(ref_count(h), None);
        assert_eq!(get_data(h), Err(UjsStatus::InvalidHandle as i32));
    }

    #[test]
    fn over_release_is_rejected() {
        let h = create(b"once");
        assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
        assert_eq!(ujs_object_release(h), UjsStatus::InvalidHandle as i32);
        assert_eq!(ujs_object_retain(h), UjsStatus::InvalidHandle as i32);
    }

    #[test]
    fn retired_handle_does_not_alias_new_object() {
        let h1 = create(b"first");
        ujs_object_release(h1);
        let h2 = create(b"second");
        assert_ne!(h1, h2);
        assert_eq!(ujs_object_release(h1), UjsStatus::InvalidHandle as i32);
        assert_eq!(get_data(h2).unwrap(), b"second");
        ujs_object_release(h2);
    }

    #[test]
    fn null_handle_is_no_op_and_reads_sentinel() {
        assert_eq!(ujs_object_retain(NULL_HANDLE), UjsStatus::Ok as i32);
        assert_eq!(ujs_object_release(NULL_HANDLE), UjsStatus::Ok as i32);
        assert_eq!(get_data(NULL_HANDLE).unwrap(), b"null");
    }

    #[test]
    fn empty_payload_with_null_data() {
        let mut h = NULL_HANDLE;
        let status = ujs_object_create(std::ptr::null(), 0, &mut h);
        assert_eq!(status, UjsStatus::Ok as i32);
        assert_eq!(get_data(h).unwrap(), b"");
        assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
    }

    #[test]
    fn null_data_with_length_is_invalid() {
        let mut h = NULL_HANDLE;
        let status = ujs_object_create(std::ptr::null(), 4, &mut h);
        assert_eq!(status, UjsStatus::InvalidArgument as i32);
        assert_eq!(h, NULL_HANDLE);
    }

    #[test]
    fn null_out_is_invalid() {
        let status = ujs_object_create(DEMO.as_ptr(), DEMO.len(), std::ptr::null_mut());
        assert_eq!(status, UjsStatus::InvalidArgument as i32);
        assert_eq!(
            ujs_object_ref_count(NULL_HANDLE, std::ptr::null_mut()),
            UjsStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn create_from_cstr_drops_terminator() {
        let mut h = NULL_HANDLE;
        let status = ujs_object_create_cstr(c"from C".as_ptr(), &mut h);
        assert_eq!(status, UjsStatus::Ok as i32);
        assert_eq!(get_data(h).unwrap(), b"from C");
        ujs_object_release(h);

        assert_eq!(
            ujs_object_create_cstr(std::ptr::null(), &mut h),
            UjsStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn small_buffer_reports_required_length() {
        let h = create(DEMO);
        let mut buf = [0u8; 4];
        let mut len = 0usize;
        let status = ujs_object_get_data(h, buf.as_mut_ptr(), buf.len(), &mut len);
        assert_eq!(status, UjsStatus::BufferTooSmall as i32);
        assert_eq!(len, DEMO.len());
        ujs_object_release(h);
    }

    #[test]
    fn live_count_tracks_creates_and_final_releases() {
        let before = live();
        let a = create(b"a");
        let b = create(b"b");
        ujs_object_retain(a);
        assert_eq!(live(), before + 2);

        ujs_object_release(a);
        assert_eq!(live(), before + 2);
        ujs_object_release(a);
        ujs_object_release(b);
        assert_eq!(live(), before);
    }

    #[test]
    fn handles_are_per_thread() {
        let h = create(b"local");
        let seen = std::thread::spawn(move || ref_count(h)).join().unwrap();
        assert_eq!(seen, None);
        assert_eq!(ref_count(h), Some(1));
        ujs_object_release(h);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn n_retains_need_n_plus_one_releases(n in 0usize..32) {
                let h = create(b"payload");
                for _ in 0..n {
                    prop_assert_eq!(ujs_object_retain(h), UjsStatus::Ok as i32);
                }
                for remaining in (1..=n).rev() {
                    prop_assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
                    prop_assert_eq!(ref_count(h), Some(remaining));
                }
                prop_assert_eq!(ujs_object_release(h), UjsStatus::Ok as i32);
                prop_assert_eq!(ref_count(h), None);
            }

            #[test]
            fn payload_round_trips(data in proptest::collection::vec(any::<u8>(), 0..200)) {
                let h = create(&data);
                prop_assert_eq!(get_data(h).unwrap(), data);
                ujs_object_release(h);
            }
        }
    }
}
