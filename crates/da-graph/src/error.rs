//! Graph-specific error types.

use da_core::{DaError, DeviceId, PortId, ShaftId};

use crate::graph::{DeviceKind, PortRole};

pub type GraphResult<T> = Result<T, GraphError>;

/// Topology construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A port refers to a shaft that doesn't exist.
    InvalidShaftRef { port: PortId, shaft: ShaftId },

    /// A port refers to a device that doesn't exist.
    InvalidDeviceRef { port: PortId, device: DeviceId },

    /// A device's ports don't match what its kind expects.
    PortShape {
        device: DeviceId,
        kind: DeviceKind,
        found: Vec<PortRole>,
    },

    /// A device uses the same shaft in two resolving slots.
    RepeatedShaft { device: DeviceId, shaft: ShaftId },

    /// Two devices both drive the same shaft as a fixed output.
    ConflictingDrivers {
        shaft: ShaftId,
        first: DeviceId,
        second: DeviceId,
    },

    /// No motor: nothing would ever seed propagation.
    MissingMotor,

    /// More than one motor.
    MultipleMotors { first: DeviceId, second: DeviceId },

    /// A port's device field doesn't match the device listing it.
    PortDeviceMismatch {
        port: PortId,
        expected: DeviceId,
        actual: DeviceId,
    },

    /// Adjacency list is inconsistent.
    InconsistentAdjacency { port: PortId, shaft: ShaftId },

    /// External shaft key registered twice.
    DuplicateKey { key: i64 },

    /// External shaft key not registered.
    UnknownKey { key: i64 },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidShaftRef { port, shaft } => {
                write!(f, "Port {} refers to non-existent shaft {}", port, shaft)
            }
            GraphError::InvalidDeviceRef { port, device } => {
                write!(f, "Port {} refers to non-existent device {}", port, device)
            }
            GraphError::PortShape {
                device,
                kind,
                found,
            } => {
                write!(
                    f,
                    "Device {} ({:?}) has ports {:?} (expected {:?})",
                    device,
                    kind,
                    found,
                    kind.port_shape()
                )
            }
            GraphError::RepeatedShaft { device, shaft } => {
                write!(f, "Device {} uses shaft {} more than once", device, shaft)
            }
            GraphError::ConflictingDrivers {
                shaft,
                first,
                second,
            } => {
                write!(
                    f,
                    "Shaft {} is driven by both device {} and device {}",
                    shaft, first, second
                )
            }
            GraphError::MissingMotor => write!(f, "Machine has no motor"),
            GraphError::MultipleMotors { first, second } => {
                write!(
                    f,
                    "Only one motor is allowed (devices {} and {})",
                    first, second
                )
            }
            GraphError::PortDeviceMismatch {
                port,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Port {} should belong to device {} but references {}",
                    port, expected, actual
                )
            }
            GraphError::InconsistentAdjacency { port, shaft } => {
                write!(
                    f,
                    "Port {} in shaft {}'s adjacency list but doesn't reference that shaft",
                    port, shaft
                )
            }
            GraphError::DuplicateKey { key } => write!(f, "Shaft key {} registered twice", key),
            GraphError::UnknownKey { key } => write!(f, "Shaft key {} not found", key),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for DaError {
    fn from(err: GraphError) -> Self {
        DaError::Invariant {
            what: err.to_string(),
        }
    }
}
