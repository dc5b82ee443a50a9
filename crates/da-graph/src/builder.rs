//! Incremental topology builder.

use std::collections::HashMap;

use da_core::{DeviceId, PortId, ShaftId};
use tracing::debug;

use crate::error::GraphResult;
use crate::graph::{Device, DeviceKind, Graph, Orientation, Port, PortRole, Shaft};
use crate::validate;

/// Builder for constructing a machine topology incrementally.
///
/// Use `add_shaft` and `add_device` to build up the machine, then call
/// `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    shafts: Vec<Shaft>,
    devices: Vec<Device>,
    ports: Vec<Port>,
    next_shaft_id: u32,
    next_device_id: u32,
    next_port_id: u32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shaft and return its ID.
    pub fn add_shaft(&mut self, name: impl Into<String>, orientation: Orientation) -> ShaftId {
        let id = ShaftId::from_index(self.next_shaft_id);
        self.next_shaft_id += 1;
        self.shafts.push(Shaft {
            id,
            name: name.into(),
            orientation,
        });
        id
    }

    /// Add a device attached to `connections`, one port per entry, in order.
    ///
    /// The shape is only checked by `build()`.
    pub fn add_device(
        &mut self,
        name: impl Into<String>,
        kind: DeviceKind,
        connections: &[(ShaftId, PortRole)],
    ) -> DeviceId {
        let device_id = DeviceId::from_index(self.next_device_id);
        self.next_device_id += 1;

        let mut port_ids = Vec::with_capacity(connections.len());
        for &(shaft, role) in connections {
            let port_id = PortId::from_index(self.next_port_id);
            self.next_port_id += 1;
            self.ports.push(Port {
                id: port_id,
                device: device_id,
                shaft,
                role,
            });
            port_ids.push(port_id);
        }

        self.devices.push(Device {
            id: device_id,
            name: name.into(),
            kind,
            ports: port_ids,
        });

        device_id
    }

    pub fn shaft_count(&self) -> usize {
        self.shafts.len()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Validate and freeze.
    pub fn build(self) -> GraphResult<Graph> {
        validate::validate_structure(&self.shafts, &self.devices, &self.ports)?;
        let motor = validate::validate_machine(&self.devices, &self.ports)?;

        let (shaft_port_offsets, shaft_ports) = Self::build_adjacency(&self.shafts, &self.ports);
        validate::validate_adjacency(&self.shafts, &self.ports, &shaft_port_offsets, &shaft_ports)?;

        debug!(
            shafts = self.shafts.len(),
            devices = self.devices.len(),
            ports = self.ports.len(),
            "machine topology built"
        );

        Ok(Graph {
            shafts: self.shafts,
            devices: self.devices,
            ports: self.ports,
            shaft_port_offsets,
            shaft_ports,
            motor,
        })
    }

    /// For each shaft, collect its ports (sorted by port ID).
    fn build_adjacency(shafts: &[Shaft], ports: &[Port]) -> (Vec<usize>, Vec<PortId>) {
        let mut shaft_to_ports: HashMap<ShaftId, Vec<PortId>> = HashMap::new();
        for port in ports {
            shaft_to_ports.entry(port.shaft).or_default().push(port.id);
        }
        for list in shaft_to_ports.values_mut() {
            list.sort_by_key(|p| p.index());
        }

        let mut offsets = Vec::with_capacity(shafts.len() + 1);
        let mut flat_ports = Vec::with_capacity(ports.len());
        offsets.push(0);

        for shaft in shafts {
            if let Some(list) = shaft_to_ports.get(&shaft.id) {
                flat_ports.extend_from_slice(list);
            }
            offsets.push(flat_ports.len());
        }

        (offsets, flat_ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn builder_assigns_sequential_ids() {
        let mut builder = GraphBuilder::new();
        let s1 = builder.add_shaft("S1", Orientation::Horizontal);
        let s2 = builder.add_shaft("S2", Orientation::Vertical);
        let d = builder.add_device(
            "gear",
            DeviceKind::Gear,
            &[(s1, PortRole::Link), (s2, PortRole::Link)],
        );

        assert_eq!(s1.index(), 0);
        assert_eq!(s2.index(), 1);
        assert_eq!(d.index(), 0);
        assert_eq!(builder.shaft_count(), 2);
        assert_eq!(builder.device_count(), 1);
        assert_eq!(builder.ports.len(), 2);
    }

    #[test]
    fn build_requires_a_motor() {
        let mut builder = GraphBuilder::new();
        builder.add_shaft("S1", Orientation::Point);
        assert_eq!(builder.build().unwrap_err(), GraphError::MissingMotor);
    }

    #[test]
    fn build_simple_adjacency() {
        let mut builder = GraphBuilder::new();
        let s1 = builder.add_shaft("S1", Orientation::Horizontal);
        let s2 = builder.add_shaft("S2", Orientation::Horizontal);
        builder.add_device("motor", DeviceKind::Motor, &[(s1, PortRole::Output)]);
        builder.add_device(
            "mul",
            DeviceKind::Multiplier,
            &[(s1, PortRole::Input), (s2, PortRole::Output)],
        );

        let graph = builder.build().unwrap();
        assert_eq!(graph.ports().len(), 3);
        assert_eq!(graph.shaft_ports(s1).len(), 2);
        assert_eq!(graph.shaft_ports(s2).len(), 1);
        // only the multiplier reacts to s1; the motor drives it
        assert_eq!(graph.reactive_devices(s1).count(), 1);
        assert_eq!(graph.reactive_devices(s2).count(), 0);
    }
}
