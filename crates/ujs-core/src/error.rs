//! Object lifecycle error types.

use std::error::Error;
use std::fmt;

/// Errors reported when creating a [`JsObject`](crate::JsObject).
///
/// Creation is the only fallible lifecycle operation. Retain, release and
/// read never fail; misuse such as over-release is ruled out by ownership
/// rather than reported here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandleError {
    /// The payload buffer could not be allocated.
    AllocationFailed {
        /// Number of payload bytes requested.
        requested: usize,
    },
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "object allocation failed: requested {requested} bytes")
            }
        }
    }
}

impl Error for HandleError {}
