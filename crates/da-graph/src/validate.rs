//! Topology validation.

use std::collections::HashMap;

use da_core::{DeviceId, PortId, ShaftId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Device, DeviceKind, Port, PortRole, Shaft};

/// References exist, ports agree with their devices, and every device has the
/// port shape its kind requires.
pub(crate) fn validate_structure(
    shafts: &[Shaft],
    devices: &[Device],
    ports: &[Port],
) -> GraphResult<()> {
    for (i, port) in ports.iter().enumerate() {
        if port.id.slot() != i {
            return Err(GraphError::InconsistentAdjacency {
                port: port.id,
                shaft: port.shaft,
            });
        }
        if port.shaft.slot() >= shafts.len() {
            return Err(GraphError::InvalidShaftRef {
                port: port.id,
                shaft: port.shaft,
            });
        }
        if port.device.slot() >= devices.len() {
            return Err(GraphError::InvalidDeviceRef {
                port: port.id,
                device: port.device,
            });
        }
    }

    for device in devices {
        let mut roles = Vec::with_capacity(device.ports.len());
        for &port_id in &device.ports {
            let port = ports
                .get(port_id.slot())
                .ok_or(GraphError::InvalidDeviceRef {
                    port: port_id,
                    device: device.id,
                })?;
            if port.device != device.id {
                return Err(GraphError::PortDeviceMismatch {
                    port: port_id,
                    expected: device.id,
                    actual: port.device,
                });
            }
            roles.push(port.role);
        }

        if !shape_matches(device.kind, &roles) {
            return Err(GraphError::PortShape {
                device: device.id,
                kind: device.kind,
                found: roles,
            });
        }

        // resolving slots need distinct shafts
        let mut seen: Vec<ShaftId> = Vec::new();
        for &port_id in &device.ports {
            let port = &ports[port_id.slot()];
            if !port.role.resolves() {
                continue;
            }
            if seen.contains(&port.shaft) {
                return Err(GraphError::RepeatedShaft {
                    device: device.id,
                    shaft: port.shaft,
                });
            }
            seen.push(port.shaft);
        }
    }

    Ok(())
}

fn shape_matches(kind: DeviceKind, roles: &[PortRole]) -> bool {
    let shape = kind.port_shape();
    match kind {
        DeviceKind::OutputTable => roles.len() >= 2 && shape.starts_with(roles),
        _ => shape == roles,
    }
}

/// Exactly one motor, and no shaft with two fixed drivers. Returns the motor.
pub(crate) fn validate_machine(devices: &[Device], ports: &[Port]) -> GraphResult<DeviceId> {
    let mut motor: Option<DeviceId> = None;
    for device in devices.iter().filter(|d| d.kind == DeviceKind::Motor) {
        if let Some(first) = motor {
            return Err(GraphError::MultipleMotors {
                first,
                second: device.id,
            });
        }
        motor = Some(device.id);
    }

    let mut drivers: HashMap<ShaftId, DeviceId> = HashMap::new();
    for port in ports.iter().filter(|p| p.role == PortRole::Output) {
        if let Some(&first) = drivers.get(&port.shaft) {
            return Err(GraphError::ConflictingDrivers {
                shaft: port.shaft,
                first,
                second: port.device,
            });
        }
        drivers.insert(port.shaft, port.device);
    }

    motor.ok_or(GraphError::MissingMotor)
}

/// Every port appears exactly once, under its own shaft.
pub(crate) fn validate_adjacency(
    shafts: &[Shaft],
    ports: &[Port],
    shaft_port_offsets: &[usize],
    shaft_ports: &[PortId],
) -> GraphResult<()> {
    if shaft_port_offsets.len() != shafts.len() + 1 || shaft_ports.len() != ports.len() {
        let port = ports.first();
        return Err(GraphError::InconsistentAdjacency {
            port: port.map_or(PortId::from_index(0), |p| p.id),
            shaft: port.map_or(ShaftId::from_index(0), |p| p.shaft),
        });
    }

    let mut seen = vec![false; ports.len()];
    for shaft in shafts {
        let idx = shaft.id.slot();
        let start = shaft_port_offsets[idx];
        let end = shaft_port_offsets[idx + 1];

        for &port_id in &shaft_ports[start..end] {
            let inconsistent = GraphError::InconsistentAdjacency {
                port: port_id,
                shaft: shaft.id,
            };
            let Some(port) = ports.get(port_id.slot()) else {
                return Err(inconsistent);
            };
            if port.shaft != shaft.id || seen[port_id.slot()] {
                return Err(inconsistent);
            }
            seen[port_id.slot()] = true;
        }
    }

    Ok(())
}
