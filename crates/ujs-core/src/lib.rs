//! Core types for the UnleashedJS native runtime.
//!
//! This is the leaf crate of the workspace. It defines the
//! reference-counted [`JsObject`] and the stateless native utilities the
//! runtime exposes next to it: greeting and build identification strings,
//! the fast-math dispatcher, the cycle counter, and the lifecycle demo.
//!
//! # Object lifecycle
//!
//! ```text
//! create ──► Live(1)
//! Live(n)   ──retain───► Live(n+1)
//! Live(n>1) ──release──► Live(n-1)
//! Live(1)   ──release──► Freed (terminal)
//! ```
//!
//! `retain` hands out a new owner value and `release` consumes one, so
//! releasing twice through the same owner does not compile.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod cycles;
pub mod demo;
pub mod error;
pub mod info;
pub mod math;
pub mod object;

pub use config::{ConfigError, RuntimeConfig};
pub use cycles::cpu_cycles;
pub use demo::{perform_low_level_demo, DemoTrace, Transition};
pub use error::HandleError;
pub use info::{hello, system_info};
pub use math::{fast_math, MathOp};
pub use object::{create, read, release, retain, JsObject, Released, NULL_SENTINEL};
