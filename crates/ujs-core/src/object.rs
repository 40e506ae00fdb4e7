//! Reference-counted runtime objects.
//!
//! A [`JsObject`] is one owner of a shared, immutable byte payload. The
//! count lives next to the payload in a single `Rc` allocation: cloning an
//! owner is a retain, consuming or dropping one is a release, and the
//! payload and its header are freed together when the last owner goes.
//!
//! The free functions [`create`], [`retain`], [`release`] and [`read`]
//! accept `Option` so that an absent object is a no-op (or, for `read`,
//! yields [`NULL_SENTINEL`]) instead of an error.

use std::fmt;
use std::rc::Rc;

use crate::error::HandleError;

/// Payload returned by [`read`] when no object is supplied.
pub const NULL_SENTINEL: &[u8] = b"null";

struct ObjectInner {
    data: Box<[u8]>,
}

impl Drop for ObjectInner {
    fn drop(&mut self) {
        log::trace!("freeing object payload ({} bytes)", self.data.len());
    }
}

/// One owner of a shared runtime object.
///
/// A freshly created object has exactly one owner. [`retain`](Self::retain)
/// produces another, [`release`](Self::release) gives one up, and the
/// payload is freed by the release that takes the count from 1 to 0.
/// Dropping an owner releases it implicitly.
///
/// The count is not atomic, so owners are neither `Send` nor `Sync`.
pub struct JsObject {
    inner: Rc<ObjectInner>,
}

/// Outcome of [`JsObject::release`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    /// Other owners remain; the object is still live.
    Live {
        /// Number of owners left after this release.
        remaining: usize,
    },
    /// The last owner was released and the object has been freed.
    Freed,
}

impl Released {
    /// Whether this release freed the object.
    pub fn is_freed(self) -> bool {
        matches!(self, Self::Freed)
    }
}

/// Reserve a buffer of exactly `len` bytes, reporting failure instead of
/// aborting.
fn alloc_buffer(len: usize) -> Result<Vec<u8>, HandleError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| HandleError::AllocationFailed { requested: len })?;
    Ok(buf)
}

impl JsObject {
    /// Create an object holding a copy of `data`, with one owner.
    ///
    /// An empty payload is valid. Fails only if the payload buffer cannot
    /// be allocated, in which case nothing is left allocated.
    pub fn create(data: &[u8]) -> Result<Self, HandleError> {
        let mut buf = alloc_buffer(data.len())?;
        buf.extend_from_slice(data);
        Ok(Self::from_vec(buf))
    }

    /// Create an object that takes ownership of `data` without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let data = data.into_boxed_slice();
        log::trace!("created object ({} bytes)", data.len());
        Self {
            inner: Rc::new(ObjectInner { data }),
        }
    }

    /// Register one more owner, returning it.
    ///
    /// Increments the count by exactly one. The payload is untouched.
    pub fn retain(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Give up this owner.
    ///
    /// Decrements the count by exactly one. When it reaches zero the
    /// payload and then the header are deallocated before this returns.
    pub fn release(self) -> Released {
        let remaining = Rc::strong_count(&self.inner) - 1;
        drop(self.inner);
        if remaining == 0 {
            Released::Freed
        } else {
            Released::Live { remaining }
        }
    }

    /// Current number of owners. Always at least 1 while any owner exists.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// The payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.data()).ok()
    }

    /// Payload length in bytes, fixed at creation.
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Identity of the shared object.
    ///
    /// Equal for every owner of the same object and stable for its
    /// lifetime. The value is the address of the counted header and may be
    /// reused after the object is freed.
    pub fn object_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    /// Whether `self` and `other` are owners of the same object.
    pub fn same_object(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Clone for JsObject {
    fn clone(&self) -> Self {
        self.retain()
    }
}

impl TryFrom<&str> for JsObject {
    type Error = HandleError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::create(text.as_bytes())
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsObject")
            .field("ref_count", &self.ref_count())
            .field("len", &self.len())
            .finish()
    }
}

/// Create an object holding a copy of `data`. See [`JsObject::create`].
pub fn create(data: &[u8]) -> Result<JsObject, HandleError> {
    JsObject::create(data)
}

/// Retain `obj`, returning the new owner. `None` is a no-op.
pub fn retain(obj: Option<&JsObject>) -> Option<JsObject> {
    obj.map(JsObject::retain)
}

/// Release `obj`. `None` is a no-op and returns `None`.
pub fn release(obj: Option<JsObject>) -> Option<Released> {
    obj.map(JsObject::release)
}

/// Read the payload of `obj`, or [`NULL_SENTINEL`] when absent.
pub fn read(obj: Option<&JsObject>) -> &[u8] {
    match obj {
        Some(obj) => obj.data(),
        None => NULL_SENTINEL,
    }
}
