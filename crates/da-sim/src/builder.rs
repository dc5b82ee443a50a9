//! Assembling a [`Simulator`] from shafts and devices.

use da_core::{DeviceId, ShaftId};
use da_graph::{GraphBuilder, Orientation};
use tracing::debug;

use crate::device::Device;
use crate::error::SimResult;
use crate::simulator::Simulator;

/// Collects shafts and devices; topology is checked by [`SimulatorBuilder::build`].
#[derive(Debug, Default)]
pub struct SimulatorBuilder {
    graph: GraphBuilder,
    devices: Vec<Device>,
}

impl SimulatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shaft(&mut self, name: impl Into<String>, orientation: Orientation) -> ShaftId {
        self.graph.add_shaft(name, orientation)
    }

    /// Add a device wired to the shafts it names.
    pub fn add(&mut self, name: impl Into<String>, device: impl Into<Device>) -> DeviceId {
        let device = device.into();
        let id = self
            .graph
            .add_device(name, device.kind(), &device.connections());
        self.devices.push(device);
        id
    }

    pub fn shaft_count(&self) -> usize {
        self.graph.shaft_count()
    }

    pub fn build(self) -> SimResult<Simulator> {
        for device in &self.devices {
            device.check_parameters()?;
        }
        let graph = self.graph.build()?;
        debug!(
            unconnected = graph.unconnected_shafts().count(),
            "simulator ready"
        );
        Ok(Simulator::new(graph, self.devices))
    }
}
