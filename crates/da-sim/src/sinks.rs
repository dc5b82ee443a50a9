//! Sinks: devices that observe committed shafts after every tick.

use da_core::{Real, ShaftId};

use crate::shaft::ShaftState;

/// Records running positions of up to three shafts, one entry per tick.
///
/// Each history starts at its initial value and grows by the watched shaft's
/// committed rotation: `next = last + current_rotation`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub x: ShaftId,
    pub y1: ShaftId,
    pub y2: Option<ShaftId>,
    initial: [Real; 3],
    x_history: Vec<Real>,
    y1_history: Vec<Real>,
    y2_history: Option<Vec<Real>>,
}

impl OutputTable {
    pub fn new(x: ShaftId, y1: ShaftId, y2: Option<ShaftId>) -> Self {
        Self::with_initial(x, y1, y2, [0.0; 3])
    }

    /// `initial` is `[x0, y1_0, y2_0]`; `y2_0` is ignored without `y2`.
    pub fn with_initial(x: ShaftId, y1: ShaftId, y2: Option<ShaftId>, initial: [Real; 3]) -> Self {
        Self {
            x,
            y1,
            y2,
            initial,
            x_history: vec![initial[0]],
            y1_history: vec![initial[1]],
            y2_history: y2.map(|_| vec![initial[2]]),
        }
    }

    pub fn x_history(&self) -> &[Real] {
        &self.x_history
    }

    pub fn y1_history(&self) -> &[Real] {
        &self.y1_history
    }

    pub fn y2_history(&self) -> Option<&[Real]> {
        self.y2_history.as_deref()
    }

    pub fn len(&self) -> usize {
        self.x_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_history.is_empty()
    }

    pub(crate) fn record(&mut self, shafts: &[ShaftState]) {
        push_running(&mut self.x_history, &shafts[self.x.slot()]);
        push_running(&mut self.y1_history, &shafts[self.y1.slot()]);
        if let (Some(y2), Some(history)) = (self.y2, self.y2_history.as_mut()) {
            push_running(history, &shafts[y2.slot()]);
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::with_initial(self.x, self.y1, self.y2, self.initial);
    }
}

fn push_running(history: &mut Vec<Real>, shaft: &ShaftState) {
    let last = history.last().copied().unwrap_or(0.0);
    history.push(last + shaft.current_rotation);
}

/// A counter showing the total rotation of one shaft.
#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    pub shaft: ShaftId,
    initial: Real,
    total: Real,
}

impl Dial {
    pub fn new(shaft: ShaftId) -> Self {
        Self::with_initial(shaft, 0.0)
    }

    pub fn with_initial(shaft: ShaftId, initial: Real) -> Self {
        Self {
            shaft,
            initial,
            total: initial,
        }
    }

    pub fn reading(&self) -> Real {
        self.total
    }

    pub(crate) fn record(&mut self, shafts: &[ShaftState]) {
        self.total += shafts[self.shaft.slot()].current_rotation;
    }

    pub(crate) fn reset(&mut self) {
        self.total = self.initial;
    }
}
