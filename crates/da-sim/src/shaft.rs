//! Double-buffered shaft state.

use da_core::{DeviceId, Real};

/// Per-shaft simulation state.
///
/// A shaft value is the rotation the shaft performs during one tick.
/// Within a tick the value is built in two phases:
///
/// ```text
/// propagate:  next_rotation = <written once by a device>, ready = true
/// commit:     current_rotation = next_rotation,            ready = false
/// ```
///
/// Devices read `current_rotation` for values from the previous tick and
/// `next_rotation` (only when `ready`) for values resolved in this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaftState {
    /// Rotation published by the last commit.
    pub current_rotation: Real,
    /// Rotation resolved during the tick in progress.
    pub next_rotation: Real,
    /// `next_rotation` has been written this tick.
    pub ready: bool,
    /// Device that wrote `next_rotation`, when written during a step.
    pub driver: Option<DeviceId>,
}

impl ShaftState {
    /// A shaft at rest with `rotation` already committed.
    pub fn at(rotation: Real) -> Self {
        Self {
            current_rotation: rotation,
            next_rotation: rotation,
            ready: false,
            driver: None,
        }
    }

    /// Value resolved this tick, if any.
    pub fn resolved(&self) -> Option<Real> {
        self.ready.then_some(self.next_rotation)
    }

    /// Record this tick's value. Returns `false` if the shaft was already
    /// resolved, leaving it untouched.
    pub fn resolve(&mut self, value: Real) -> bool {
        if self.ready {
            return false;
        }
        self.next_rotation = value;
        self.ready = true;
        true
    }

    /// [`resolve`](Self::resolve), remembering `device` as the writer.
    pub fn resolve_by(&mut self, device: DeviceId, value: Real) -> bool {
        if !self.resolve(value) {
            return false;
        }
        self.driver = Some(device);
        true
    }

    /// Resolved this tick by a device other than `device`.
    pub fn driven_elsewhere(&self, device: DeviceId) -> bool {
        self.ready && self.driver.is_some_and(|d| d != device)
    }

    /// Publish `next_rotation` and clear readiness.
    pub fn commit(&mut self) {
        self.current_rotation = self.next_rotation;
        self.ready = false;
        self.driver = None;
    }

    /// Drop anything resolved in an abandoned tick.
    pub fn rollback(&mut self) {
        self.next_rotation = self.current_rotation;
        self.ready = false;
        self.driver = None;
    }
}
