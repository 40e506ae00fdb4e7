//! UnleashedJS native runtime.
//!
//! Facade over [`ujs_core`] plus the [`compiler`] report used by the `ujs`
//! command-line tool.
//!
//! # Quick start
//!
//! ```
//! use ujs::{JsObject, Released};
//!
//! let obj = JsObject::create(b"JavaScript object managed by C!").unwrap();
//! let shared = obj.retain();
//! assert_eq!(obj.ref_count(), 2);
//! assert_eq!(shared.release(), Released::Live { remaining: 1 });
//! assert_eq!(obj.release(), Released::Freed);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compiler;

pub use compiler::{Compiler, Directive};
pub use ujs_core::*;
