//! Core topology data structures.

use da_core::{DeviceId, PortId, ShaftId};

/// Grid orientation of a shaft, derived from its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// A single cell; fits either slot.
    Point,
}

impl Orientation {
    /// Orientation of a `width` x `height` span, or `None` when it extends in
    /// both directions.
    pub fn from_extent(width: i64, height: i64) -> Option<Self> {
        match (width > 1, height > 1) {
            (true, true) => None,
            (true, false) => Some(Orientation::Horizontal),
            (false, true) => Some(Orientation::Vertical),
            (false, false) => Some(Orientation::Point),
        }
    }

    pub fn fits(self, wanted: Orientation) -> bool {
        self == Orientation::Point || wanted == Orientation::Point || self == wanted
    }
}

/// How a device uses one of its shafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    /// Read in the current tick; readiness triggers the device.
    Input,
    /// Written by the device; at most one per shaft.
    Output,
    /// Either read or written depending on which side is ready.
    Link,
    /// Read from the committed value, so it never triggers the device.
    Delayed,
    /// Observed after commit by a sink.
    Watch,
}

impl PortRole {
    /// A shaft becoming ready through this port queries the device.
    pub fn reacts(self) -> bool {
        matches!(self, PortRole::Input | PortRole::Link)
    }

    /// Takes part in the per-tick resolution (as opposed to sinks and delayed reads).
    pub fn resolves(self) -> bool {
        matches!(self, PortRole::Input | PortRole::Output | PortRole::Link)
    }
}

/// Device category. Parameters live with the runtime state in `da-sim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Motor,
    Gear,
    GearPair,
    CrossConnect,
    Differential,
    Multiplier,
    Integrator,
    FunctionTable,
    OutputTable,
    Dial,
}

impl DeviceKind {
    /// Port roles this kind expects, in connection order. `OutputTable` may
    /// omit its last watch port.
    pub fn port_shape(self) -> &'static [PortRole] {
        use PortRole::*;
        match self {
            DeviceKind::Motor => &[Output],
            DeviceKind::Gear | DeviceKind::GearPair | DeviceKind::CrossConnect => &[Link, Link],
            DeviceKind::Differential => &[Link, Link, Link],
            DeviceKind::Multiplier | DeviceKind::FunctionTable => &[Input, Output],
            DeviceKind::Integrator => &[Input, Delayed, Output],
            DeviceKind::OutputTable => &[Watch, Watch, Watch],
            DeviceKind::Dial => &[Watch],
        }
    }

    pub fn is_sink(self) -> bool {
        matches!(self, DeviceKind::OutputTable | DeviceKind::Dial)
    }
}

/// A shaft: a value carrier shared by the devices attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shaft {
    pub id: ShaftId,
    pub name: String,
    pub orientation: Orientation,
}

/// A port connects a device to a shaft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    pub device: DeviceId,
    pub shaft: ShaftId,
    pub role: PortRole,
}

/// A computing element attached to one or more shafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    /// In connection order, matching [`DeviceKind::port_shape`].
    pub ports: Vec<PortId>,
}

/// A validated, immutable machine topology.
///
/// Stores shafts, devices and ports in vectors indexed by their IDs, plus
/// compact shaft -> port adjacency.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) shafts: Vec<Shaft>,
    pub(crate) devices: Vec<Device>,
    pub(crate) ports: Vec<Port>,

    /// Shaft i's ports are `shaft_ports[shaft_port_offsets[i]..shaft_port_offsets[i+1]]`.
    pub(crate) shaft_port_offsets: Vec<usize>,
    pub(crate) shaft_ports: Vec<PortId>,

    pub(crate) motor: DeviceId,
}

impl Graph {
    pub fn shafts(&self) -> &[Shaft] {
        &self.shafts
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn shaft(&self, id: ShaftId) -> Option<&Shaft> {
        self.shafts.get(id.slot())
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.slot())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.slot())
    }

    /// The single motor that seeds every tick.
    pub fn motor(&self) -> DeviceId {
        self.motor
    }

    /// All ports attached to a shaft.
    pub fn shaft_ports(&self, shaft: ShaftId) -> &[PortId] {
        let idx = shaft.slot();
        if idx >= self.shafts.len() {
            return &[];
        }
        let start = self.shaft_port_offsets[idx];
        let end = self.shaft_port_offsets[idx + 1];
        &self.shaft_ports[start..end]
    }

    /// Devices to query when `shaft` becomes ready.
    pub fn reactive_devices(&self, shaft: ShaftId) -> impl Iterator<Item = DeviceId> + '_ {
        self.shaft_ports(shaft)
            .iter()
            .map(|&p| &self.ports[p.slot()])
            .filter(|p| p.role.reacts())
            .map(|p| p.device)
    }

    /// Shafts of a device in connection order.
    pub fn device_shafts(&self, device: DeviceId) -> Vec<ShaftId> {
        self.device(device)
            .map(|d| d.ports.iter().map(|&p| self.ports[p.slot()].shaft).collect())
            .unwrap_or_default()
    }

    /// Devices that write `shaft` as a fixed output.
    pub fn drivers(&self, shaft: ShaftId) -> impl Iterator<Item = DeviceId> + '_ {
        self.shaft_ports(shaft)
            .iter()
            .map(|&p| &self.ports[p.slot()])
            .filter(|p| p.role == PortRole::Output)
            .map(|p| p.device)
    }

    /// Shafts no resolving device touches. They keep their value forever.
    pub fn unconnected_shafts(&self) -> impl Iterator<Item = ShaftId> + '_ {
        self.shafts.iter().map(|s| s.id).filter(|&s| {
            !self
                .shaft_ports(s)
                .iter()
                .any(|&p| self.ports[p.slot()].role.resolves())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_from_extent() {
        assert_eq!(Orientation::from_extent(5, 1), Some(Orientation::Horizontal));
        assert_eq!(Orientation::from_extent(1, 3), Some(Orientation::Vertical));
        assert_eq!(Orientation::from_extent(1, 1), Some(Orientation::Point));
        assert_eq!(Orientation::from_extent(2, 2), None);
    }

    #[test]
    fn point_fits_anything() {
        assert!(Orientation::Point.fits(Orientation::Horizontal));
        assert!(Orientation::Vertical.fits(Orientation::Vertical));
        assert!(!Orientation::Vertical.fits(Orientation::Horizontal));
    }

    #[test]
    fn roles() {
        assert!(PortRole::Input.reacts());
        assert!(PortRole::Link.reacts());
        assert!(!PortRole::Delayed.reacts());
        assert!(!PortRole::Output.reacts());
        assert!(!PortRole::Watch.resolves());
    }

    #[test]
    fn port_shapes() {
        assert_eq!(DeviceKind::Differential.port_shape().len(), 3);
        assert_eq!(
            DeviceKind::Integrator.port_shape(),
            &[PortRole::Input, PortRole::Delayed, PortRole::Output]
        );
        assert!(DeviceKind::Dial.is_sink());
        assert!(!DeviceKind::Gear.is_sink());
    }
}
