//! Low-level object lifecycle demo.
//!
//! Creates one object, retains it twice, then releases all three owners,
//! recording every count transition along the way.

use smallvec::SmallVec;

use crate::error::HandleError;
use crate::object::{JsObject, Released};

/// Payload used by [`perform_low_level_demo`].
pub const DEMO_PAYLOAD: &str = "JavaScript object managed by C!";

/// One recorded step of the demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The object was created with `count` owners.
    Created {
        /// Owners after creation.
        count: usize,
    },
    /// An owner was added, bringing the total to `count`.
    Retained {
        /// Owners after the retain.
        count: usize,
    },
    /// An owner was released.
    Released(Released),
}

/// Ordered record of a demo run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemoTrace {
    steps: SmallVec<[Transition; 8]>,
}

impl DemoTrace {
    fn push(&mut self, step: Transition) {
        log::debug!("demo step: {step:?}");
        self.steps.push(step);
    }

    /// Recorded transitions in order.
    pub fn steps(&self) -> &[Transition] {
        &self.steps
    }

    /// Whether the run ended with the object freed.
    pub fn freed(&self) -> bool {
        matches!(
            self.steps.last(),
            Some(Transition::Released(Released::Freed))
        )
    }
}

/// Run the create, retain ×2, release ×3 sequence on [`DEMO_PAYLOAD`].
pub fn perform_low_level_demo() -> Result<DemoTrace, HandleError> {
    let mut trace = DemoTrace::default();

    let obj = JsObject::create(DEMO_PAYLOAD.as_bytes())?;
    trace.push(Transition::Created {
        count: obj.ref_count(),
    });

    let second = obj.retain();
    trace.push(Transition::Retained {
        count: obj.ref_count(),
    });
    let third = obj.retain();
    trace.push(Transition::Retained {
        count: obj.ref_count(),
    });

    trace.push(Transition::Released(third.release()));
    trace.push(Transition::Released(second.release()));
    trace.push(Transition::Released(obj.release()));

    Ok(trace)
}
