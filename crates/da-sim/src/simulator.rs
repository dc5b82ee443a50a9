//! Tick loop: propagate, commit, record.

use da_core::{DaError, DeviceId, Real, ShaftId};
use da_graph::Graph;
use tracing::{error, trace};

use crate::device::{Device, Resolution};
use crate::error::{SimError, SimResult};
use crate::shaft::ShaftState;
use crate::sinks::{Dial, OutputTable};

/// A machine ready to be stepped.
///
/// Each tick floods readiness outward from the motor shaft: every shaft that
/// becomes ready queries the devices reacting to it, and whatever they
/// resolve is queued in turn. Once nothing is left to resolve, every shaft
/// commits and the sinks record the committed values.
#[derive(Debug, Clone)]
pub struct Simulator {
    graph: Graph,
    devices: Vec<Device>,
    shafts: Vec<ShaftState>,
    worklist: Vec<ShaftId>,
    tick: u64,
}

impl Simulator {
    /// `devices` must be in graph order; use [`crate::SimulatorBuilder`].
    pub(crate) fn new(graph: Graph, devices: Vec<Device>) -> Self {
        let shafts = vec![ShaftState::default(); graph.shafts().len()];
        Self {
            graph,
            devices,
            shafts,
            worklist: Vec::new(),
            tick: 0,
        }
    }

    /// Advance one tick.
    ///
    /// On error nothing from the failed tick is kept: shafts and devices are
    /// back where the previous tick left them.
    pub fn step(&mut self) -> SimResult<()> {
        if let Err(e) = self.propagate() {
            error!(tick = self.tick, error = %e, "tick aborted");
            self.shafts.iter_mut().for_each(ShaftState::rollback);
            self.devices.iter_mut().for_each(Device::rollback);
            return Err(e);
        }

        for shaft in &mut self.shafts {
            shaft.commit();
        }
        for device in &mut self.devices {
            device.commit(&self.shafts);
        }
        self.tick += 1;
        trace!(tick = self.tick, "tick committed");
        Ok(())
    }

    /// Step `ticks` times, stopping at the first error.
    pub fn run(&mut self, ticks: u64) -> SimResult<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    fn propagate(&mut self) -> SimResult<()> {
        let Self {
            graph,
            devices,
            shafts,
            worklist,
            ..
        } = self;
        worklist.clear();

        resolve_device(graph.motor(), devices, shafts, worklist)?;
        while let Some(shaft) = worklist.pop() {
            for device in graph.reactive_devices(shaft) {
                resolve_device(device, devices, shafts, worklist)?;
            }
        }
        Ok(())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn motor_rotation(&self) -> Real {
        match &self.devices[self.graph.motor().slot()] {
            Device::Motor { rotation, .. } => *rotation,
            _ => 0.0,
        }
    }

    /// Change the per-tick rotation of the motor from the next tick on.
    pub fn set_motor_rotation(&mut self, value: Real) -> SimResult<()> {
        da_core::ensure_finite(value, "motor rotation")?;
        if let Device::Motor { rotation, .. } = &mut self.devices[self.graph.motor().slot()] {
            *rotation = value;
        }
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn shafts(&self) -> &[ShaftState] {
        &self.shafts
    }

    pub fn shaft(&self, id: ShaftId) -> Option<&ShaftState> {
        self.shafts.get(id.slot())
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.slot())
    }

    /// Output tables in device order.
    pub fn output_tables(&self) -> impl Iterator<Item = &OutputTable> {
        self.devices.iter().filter_map(|d| match d {
            Device::OutputTable(t) => Some(t),
            _ => None,
        })
    }

    /// The `index`-th output table.
    pub fn output_table(&self, index: usize) -> SimResult<&OutputTable> {
        let len = self.output_tables().count();
        self.output_tables().nth(index).ok_or_else(|| {
            SimError::Core(DaError::IndexOob {
                what: "output table",
                index,
                len,
            })
        })
    }

    pub fn dials(&self) -> impl Iterator<Item = &Dial> {
        self.devices.iter().filter_map(|d| match d {
            Device::Dial(d) => Some(d),
            _ => None,
        })
    }

    /// Return to tick zero. The motor keeps its current rotation.
    pub fn reset(&mut self) {
        self.shafts.fill(ShaftState::default());
        self.devices.iter_mut().for_each(Device::reset);
        self.worklist.clear();
        self.tick = 0;
    }
}

fn resolve_device(
    id: DeviceId,
    devices: &mut [Device],
    shafts: &mut [ShaftState],
    worklist: &mut Vec<ShaftId>,
) -> SimResult<()> {
    let resolution = devices[id.slot()].resolve(id, shafts)?;
    apply(id, resolution, shafts, worklist)
}

/// Record a device's write and queue the shaft. A shaft is queued exactly
/// when it turns ready, so readiness doubles as the queued mark.
///
/// Devices check readiness before writing; a write to a ready shaft here is
/// still reported rather than dropped.
fn apply(
    device: DeviceId,
    resolution: Resolution,
    shafts: &mut [ShaftState],
    worklist: &mut Vec<ShaftId>,
) -> SimResult<()> {
    let Resolution::Write { shaft, value } = resolution else {
        return Ok(());
    };
    if !shafts[shaft.slot()].resolve_by(device, value) {
        return Err(SimError::DuplicateResolution { shaft, device });
    }
    trace!(%shaft, %device, value, "shaft resolved");
    worklist.push(shaft);
    Ok(())
}
