//! Computing devices and their per-tick resolution rules.

use da_core::{ensure_finite, DeviceId, Real, ShaftId};
use da_graph::{DeviceKind, PortRole};

use crate::error::{SimError, SimResult};
use crate::shaft::ShaftState;
use crate::sinks::{Dial, OutputTable};
use crate::transfer::TransferFn;

/// Outcome of asking a device to resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Not enough ready inputs, or nothing left to do this tick.
    Idle,
    /// Write `value` as the next rotation of `shaft`.
    Write { shaft: ShaftId, value: Real },
    /// The output was already resolved this tick and is left as is.
    Unchanged(ShaftId),
}

/// Integrates an integrand against a variable of integration.
///
/// The disk sits at `disk_position` and moves by the integrand's committed
/// rotation each tick; the output is `disk * d(variable)`. Reading the
/// integrand one tick late lets integrators feed each other in loops.
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    pub variable: ShaftId,
    pub integrand: ShaftId,
    pub output: ShaftId,
    pub reversed: bool,
    initial_position: Real,
    disk_position: Real,
    pending_disk: Option<Real>,
}

impl Integrator {
    pub fn new(variable: ShaftId, integrand: ShaftId, output: ShaftId) -> Self {
        Self {
            variable,
            integrand,
            output,
            reversed: false,
            initial_position: 0.0,
            disk_position: 0.0,
            pending_disk: None,
        }
    }

    pub fn with_initial_position(mut self, position: Real) -> Self {
        self.initial_position = position;
        self.disk_position = position;
        self
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn disk_position(&self) -> Real {
        self.disk_position
    }

    fn resolve(&mut self, id: DeviceId, shafts: &[ShaftState]) -> SimResult<Resolution> {
        if let Some(done) = claimed(id, self.output, shafts)? {
            return Ok(done);
        }
        let Some(dv) = shafts[self.variable.slot()].resolved() else {
            return Ok(Resolution::Idle);
        };
        let disk = self.disk_position + shafts[self.integrand.slot()].current_rotation;
        self.pending_disk = Some(disk);
        let value = disk * dv;
        Ok(Resolution::Write {
            shaft: self.output,
            value: if self.reversed { -value } else { value },
        })
    }

    fn commit(&mut self) {
        if let Some(disk) = self.pending_disk.take() {
            self.disk_position = disk;
        }
    }

    fn reset(&mut self) {
        self.disk_position = self.initial_position;
        self.pending_disk = None;
    }
}

/// Follows a curve `y = f(x)`: the input moves the pointer along x, the
/// output turns by the resulting change in y.
#[derive(Debug, Clone)]
pub struct FunctionTable {
    pub input: ShaftId,
    pub output: ShaftId,
    function: TransferFn,
    initial_position: Real,
    x_position: Real,
    /// `f(x_position)`, filled on first use.
    level: Option<Real>,
    pending: Option<(Real, Real)>,
}

impl FunctionTable {
    pub fn new(input: ShaftId, output: ShaftId, function: TransferFn) -> Self {
        Self {
            input,
            output,
            function,
            initial_position: 0.0,
            x_position: 0.0,
            level: None,
            pending: None,
        }
    }

    pub fn with_initial_position(mut self, x: Real) -> Self {
        self.initial_position = x;
        self.x_position = x;
        self.level = None;
        self
    }

    pub fn x_position(&self) -> Real {
        self.x_position
    }

    fn resolve(&mut self, id: DeviceId, shafts: &[ShaftState]) -> SimResult<Resolution> {
        if let Some(done) = claimed(id, self.output, shafts)? {
            return Ok(done);
        }
        let Some(dx) = shafts[self.input.slot()].resolved() else {
            return Ok(Resolution::Idle);
        };
        let eval = |f: &mut TransferFn, x| {
            f.eval(x)
                .map_err(|source| SimError::Expression { device: id, source })
        };
        let old = match self.level {
            Some(v) => v,
            None => {
                let v = eval(&mut self.function, self.x_position)?;
                self.level = Some(v);
                v
            }
        };
        let x = self.x_position + dx;
        let new = eval(&mut self.function, x)?;
        self.pending = Some((x, new));
        Ok(Resolution::Write {
            shaft: self.output,
            value: new - old,
        })
    }

    fn commit(&mut self) {
        if let Some((x, level)) = self.pending.take() {
            self.x_position = x;
            self.level = Some(level);
        }
    }

    fn reset(&mut self) {
        self.x_position = self.initial_position;
        self.level = None;
        self.pending = None;
    }
}

/// Runtime state and parameters of one device.
#[derive(Debug, Clone)]
pub enum Device {
    Motor {
        shaft: ShaftId,
        rotation: Real,
        reversed: bool,
    },
    Gear {
        a: ShaftId,
        b: ShaftId,
    },
    /// `b = a * factor`, and back.
    GearPair {
        a: ShaftId,
        b: ShaftId,
        factor: Real,
    },
    CrossConnect {
        horizontal: ShaftId,
        vertical: ShaftId,
        reversed: bool,
    },
    /// Slots are `[a, sum, b]` with `sum = a + b`.
    Differential {
        shafts: [ShaftId; 3],
    },
    Multiplier {
        input: ShaftId,
        output: ShaftId,
        factor: Real,
    },
    Integrator(Integrator),
    FunctionTable(FunctionTable),
    OutputTable(OutputTable),
    Dial(Dial),
}

impl Device {
    pub fn motor(shaft: ShaftId, rotation: Real) -> Self {
        Device::Motor {
            shaft,
            rotation,
            reversed: false,
        }
    }

    pub fn gear(a: ShaftId, b: ShaftId) -> Self {
        Device::Gear { a, b }
    }

    pub fn gear_pair(a: ShaftId, b: ShaftId, factor: Real) -> Self {
        Device::GearPair { a, b, factor }
    }

    pub fn cross_connect(horizontal: ShaftId, vertical: ShaftId, reversed: bool) -> Self {
        Device::CrossConnect {
            horizontal,
            vertical,
            reversed,
        }
    }

    pub fn differential(a: ShaftId, sum: ShaftId, b: ShaftId) -> Self {
        Device::Differential {
            shafts: [a, sum, b],
        }
    }

    pub fn multiplier(input: ShaftId, output: ShaftId, factor: Real) -> Self {
        Device::Multiplier {
            input,
            output,
            factor,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Device::Motor { .. } => DeviceKind::Motor,
            Device::Gear { .. } => DeviceKind::Gear,
            Device::GearPair { .. } => DeviceKind::GearPair,
            Device::CrossConnect { .. } => DeviceKind::CrossConnect,
            Device::Differential { .. } => DeviceKind::Differential,
            Device::Multiplier { .. } => DeviceKind::Multiplier,
            Device::Integrator(_) => DeviceKind::Integrator,
            Device::FunctionTable(_) => DeviceKind::FunctionTable,
            Device::OutputTable(_) => DeviceKind::OutputTable,
            Device::Dial(_) => DeviceKind::Dial,
        }
    }

    /// Shaft connections in the order of [`DeviceKind::port_shape`].
    pub fn connections(&self) -> Vec<(ShaftId, PortRole)> {
        use PortRole::*;
        match self {
            Device::Motor { shaft, .. } => vec![(*shaft, Output)],
            Device::Gear { a, b } | Device::GearPair { a, b, .. } => vec![(*a, Link), (*b, Link)],
            Device::CrossConnect {
                horizontal,
                vertical,
                ..
            } => vec![(*horizontal, Link), (*vertical, Link)],
            Device::Differential { shafts } => shafts.iter().map(|&s| (s, Link)).collect(),
            Device::Multiplier { input, output, .. } => vec![(*input, Input), (*output, Output)],
            Device::Integrator(i) => vec![
                (i.variable, Input),
                (i.integrand, Delayed),
                (i.output, Output),
            ],
            Device::FunctionTable(f) => vec![(f.input, Input), (f.output, Output)],
            Device::OutputTable(t) => {
                let mut c = vec![(t.x, Watch), (t.y1, Watch)];
                c.extend(t.y2.map(|y2| (y2, Watch)));
                c
            }
            Device::Dial(d) => vec![(d.shaft, Watch)],
        }
    }

    /// Reject parameters no tick could use.
    pub(crate) fn check_parameters(&self) -> SimResult<()> {
        match self {
            Device::Motor { rotation, .. } => {
                ensure_finite(*rotation, "motor rotation")?;
            }
            Device::GearPair { factor, .. } => {
                ensure_finite(*factor, "gear pair factor")?;
                if *factor == 0.0 {
                    return Err(SimError::InvalidArg {
                        what: "gear pair factor must be nonzero",
                    });
                }
            }
            Device::Multiplier { factor, .. } => {
                ensure_finite(*factor, "multiplier factor")?;
            }
            Device::Integrator(i) => {
                ensure_finite(i.initial_position, "integrator initial position")?;
            }
            Device::FunctionTable(f) => {
                ensure_finite(f.initial_position, "function table initial position")?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Try to resolve one shaft from what is ready this tick.
    ///
    /// A device never overwrites a resolved shaft, so asking again after it
    /// fired is a no-op. Finding its output, or every shaft it links, already
    /// resolved by other devices means two devices drive one shaft, which
    /// fails with [`SimError::DuplicateResolution`].
    pub fn resolve(&mut self, id: DeviceId, shafts: &[ShaftState]) -> SimResult<Resolution> {
        let resolution = match self {
            Device::Motor {
                shaft,
                rotation,
                reversed,
            } => match claimed(id, *shaft, shafts)? {
                Some(done) => done,
                None => Resolution::Write {
                    shaft: *shaft,
                    value: if *reversed { -*rotation } else { *rotation },
                },
            },
            Device::Gear { a, b } => link(id, shafts, *a, *b, |v| v, |v| v)?,
            Device::GearPair { a, b, factor } => {
                let f = *factor;
                link(id, shafts, *a, *b, |v| v * f, |v| v / f)?
            }
            Device::CrossConnect {
                horizontal,
                vertical,
                reversed,
            } => {
                let sign = if *reversed { -1.0 } else { 1.0 };
                link(
                    id,
                    shafts,
                    *horizontal,
                    *vertical,
                    |v| sign * v,
                    |v| sign * v,
                )?
            }
            Device::Differential { shafts: slots } => {
                let values = slots.map(|s| shafts[s.slot()].resolved());
                match values {
                    [None, Some(sum), Some(b)] => Resolution::Write {
                        shaft: slots[0],
                        value: sum - b,
                    },
                    [Some(a), None, Some(b)] => Resolution::Write {
                        shaft: slots[1],
                        value: a + b,
                    },
                    [Some(a), Some(sum), None] => Resolution::Write {
                        shaft: slots[2],
                        value: sum - a,
                    },
                    [Some(_), Some(_), Some(_)] => settled(id, &slots[..], shafts)?,
                    _ => Resolution::Idle,
                }
            }
            Device::Multiplier {
                input,
                output,
                factor,
            } => match claimed(id, *output, shafts)? {
                Some(done) => done,
                None => match shafts[input.slot()].resolved() {
                    Some(x) => Resolution::Write {
                        shaft: *output,
                        value: x * *factor,
                    },
                    None => Resolution::Idle,
                },
            },
            Device::Integrator(i) => i.resolve(id, shafts)?,
            Device::FunctionTable(f) => f.resolve(id, shafts)?,
            Device::OutputTable(_) | Device::Dial(_) => Resolution::Idle,
        };
        Ok(resolution)
    }

    /// Adopt state staged during a successful tick, then let sinks observe
    /// the committed shafts.
    pub(crate) fn commit(&mut self, shafts: &[ShaftState]) {
        match self {
            Device::Integrator(i) => i.commit(),
            Device::FunctionTable(f) => f.commit(),
            Device::OutputTable(t) => t.record(shafts),
            Device::Dial(d) => d.record(shafts),
            _ => {}
        }
    }

    /// Forget state staged during an abandoned tick.
    pub(crate) fn rollback(&mut self) {
        match self {
            Device::Integrator(i) => i.pending_disk = None,
            Device::FunctionTable(f) => f.pending = None,
            _ => {}
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Device::Integrator(i) => i.reset(),
            Device::FunctionTable(f) => f.reset(),
            Device::OutputTable(t) => t.reset(),
            Device::Dial(d) => d.reset(),
            _ => {}
        }
    }
}

/// An output already resolved this tick is reported unchanged, unless some
/// other device wrote it.
fn claimed(
    id: DeviceId,
    output: ShaftId,
    shafts: &[ShaftState],
) -> SimResult<Option<Resolution>> {
    let state = &shafts[output.slot()];
    if state.driven_elsewhere(id) {
        return Err(SimError::DuplicateResolution {
            shaft: output,
            device: id,
        });
    }
    Ok(state.ready.then_some(Resolution::Unchanged(output)))
}

/// Every linked shaft is resolved. Fine when this device wrote one of them;
/// when other devices wrote them all, the last one had two drivers.
fn settled(id: DeviceId, linked: &[ShaftId], shafts: &[ShaftState]) -> SimResult<Resolution> {
    match linked.last() {
        Some(&shaft) if linked.iter().all(|s| shafts[s.slot()].driven_elsewhere(id)) => {
            Err(SimError::DuplicateResolution { shaft, device: id })
        }
        _ => Ok(Resolution::Idle),
    }
}

/// Copy a ready side of a two-shaft device into the unready one.
fn link(
    id: DeviceId,
    shafts: &[ShaftState],
    a: ShaftId,
    b: ShaftId,
    forward: impl Fn(Real) -> Real,
    backward: impl Fn(Real) -> Real,
) -> SimResult<Resolution> {
    let resolution = match (shafts[a.slot()].resolved(), shafts[b.slot()].resolved()) {
        (Some(v), None) => Resolution::Write {
            shaft: b,
            value: forward(v),
        },
        (None, Some(v)) => Resolution::Write {
            shaft: a,
            value: backward(v),
        },
        (Some(_), Some(_)) => return settled(id, &[a, b], shafts),
        (None, None) => Resolution::Idle,
    };
    Ok(resolution)
}

impl From<Integrator> for Device {
    fn from(i: Integrator) -> Self {
        Device::Integrator(i)
    }
}

impl From<FunctionTable> for Device {
    fn from(f: FunctionTable) -> Self {
        Device::FunctionTable(f)
    }
}

impl From<OutputTable> for Device {
    fn from(t: OutputTable) -> Self {
        Device::OutputTable(t)
    }
}

impl From<Dial> for Device {
    fn from(d: Dial) -> Self {
        Device::Dial(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(i: u32) -> ShaftId {
        ShaftId::from_index(i)
    }

    fn did() -> DeviceId {
        DeviceId::from_index(0)
    }

    fn shafts(ready: &[Option<Real>]) -> Vec<ShaftState> {
        ready
            .iter()
            .map(|r| {
                let mut s = ShaftState::default();
                if let Some(v) = r {
                    s.resolve(*v);
                }
                s
            })
            .collect()
    }

    fn written(r: Resolution) -> (ShaftId, Real) {
        match r {
            Resolution::Write { shaft, value } => (shaft, value),
            other => panic!("expected a write, got {other:?}"),
        }
    }

    #[test]
    fn motor_writes_rotation() {
        let mut m = Device::motor(sid(0), 0.25);
        let r = m.resolve(did(), &shafts(&[None])).unwrap();
        assert_eq!(written(r), (sid(0), 0.25));

        let mut m = Device::Motor {
            shaft: sid(0),
            rotation: 0.25,
            reversed: true,
        };
        let r = m.resolve(did(), &shafts(&[None])).unwrap();
        assert_eq!(written(r), (sid(0), -0.25));
    }

    #[test]
    fn gear_copies_either_way() {
        let mut g = Device::gear(sid(0), sid(1));
        let (s, v) = written(g.resolve(did(), &shafts(&[Some(0.5), None])).unwrap());
        assert_eq!((s, v), (sid(1), 0.5));
        let (s, v) = written(g.resolve(did(), &shafts(&[None, Some(-2.0)])).unwrap());
        assert_eq!((s, v), (sid(0), -2.0));
        assert_eq!(
            g.resolve(did(), &shafts(&[Some(1.0), Some(1.0)])).unwrap(),
            Resolution::Idle
        );
        assert_eq!(g.resolve(did(), &shafts(&[None, None])).unwrap(), Resolution::Idle);
    }

    #[test]
    fn gear_pair_scales_forward_and_divides_back() {
        let mut g = Device::gear_pair(sid(0), sid(1), 4.0);
        let (_, v) = written(g.resolve(did(), &shafts(&[Some(0.5), None])).unwrap());
        assert_eq!(v, 2.0);
        let (_, v) = written(g.resolve(did(), &shafts(&[None, Some(2.0)])).unwrap());
        assert_eq!(v, 0.5);
    }

    #[test]
    fn reversed_cross_connect_negates() {
        let mut c = Device::cross_connect(sid(0), sid(1), true);
        let (s, v) = written(c.resolve(did(), &shafts(&[Some(0.3), None])).unwrap());
        assert_eq!((s, v), (sid(1), -0.3));
        let (s, v) = written(c.resolve(did(), &shafts(&[None, Some(0.3)])).unwrap());
        assert_eq!((s, v), (sid(0), -0.3));
    }

    #[test]
    fn differential_resolves_each_slot() {
        let mut d = Device::differential(sid(0), sid(1), sid(2));

        let (s, v) = written(d.resolve(did(), &shafts(&[Some(0.22), Some(0.57), None])).unwrap());
        assert_eq!(s, sid(2));
        assert!((v - 0.35).abs() < 1e-12);

        let (s, v) = written(d.resolve(did(), &shafts(&[Some(0.22), None, Some(0.35)])).unwrap());
        assert_eq!(s, sid(1));
        assert!((v - 0.57).abs() < 1e-12);

        let (s, v) = written(d.resolve(did(), &shafts(&[None, Some(0.57), Some(0.35)])).unwrap());
        assert_eq!(s, sid(0));
        assert!((v - 0.22).abs() < 1e-12);
    }

    #[test]
    fn differential_needs_exactly_two() {
        let mut d = Device::differential(sid(0), sid(1), sid(2));
        for ready in [
            [None, None, None],
            [Some(1.0), None, None],
            [Some(1.0), Some(2.0), Some(3.0)],
        ] {
            assert_eq!(d.resolve(did(), &shafts(&ready)).unwrap(), Resolution::Idle);
        }
    }

    #[test]
    fn multiplier_is_idempotent_once_output_ready() {
        let mut m = Device::multiplier(sid(0), sid(1), 3.0);
        let (s, v) = written(m.resolve(did(), &shafts(&[Some(0.5), None])).unwrap());
        assert_eq!((s, v), (sid(1), 1.5));
        assert_eq!(
            m.resolve(did(), &shafts(&[Some(0.5), Some(9.0)])).unwrap(),
            Resolution::Unchanged(sid(1))
        );
        assert_eq!(
            m.resolve(did(), &shafts(&[None, Some(9.0)])).unwrap(),
            Resolution::Unchanged(sid(1))
        );
        assert_eq!(m.resolve(did(), &shafts(&[None, None])).unwrap(), Resolution::Idle);
    }

    #[test]
    fn outputs_written_by_another_device_are_duplicates() {
        let other = DeviceId::from_index(7);
        let mut s = shafts(&[Some(0.5), None, None]);
        s[1].resolve_by(other, 2.0);
        s[2].resolve_by(did(), 1.0);

        let mut m = Device::multiplier(sid(0), sid(1), 3.0);
        assert!(matches!(
            m.resolve(did(), &s),
            Err(SimError::DuplicateResolution { shaft, device }) if shaft == sid(1) && device == did()
        ));

        // its own earlier write is just a re-query
        assert_eq!(m.resolve(other, &s).unwrap(), Resolution::Unchanged(sid(1)));

        let mut i = Device::from(Integrator::new(sid(0), sid(2), sid(1)));
        assert!(i.resolve(did(), &s).is_err());
        let mut f = Device::from(FunctionTable::new(sid(0), sid(1), TransferFn::Constant(1.0)));
        assert!(f.resolve(did(), &s).is_err());
    }

    #[test]
    fn links_fully_driven_elsewhere_are_duplicates() {
        let (motor, mul) = (DeviceId::from_index(1), DeviceId::from_index(2));
        let mut s = shafts(&[None, None, None]);
        s[0].resolve_by(motor, 1.0);
        s[1].resolve_by(mul, 2.0);

        let mut g = Device::gear_pair(sid(0), sid(1), 3.0);
        assert!(matches!(
            g.resolve(did(), &s),
            Err(SimError::DuplicateResolution { shaft, .. }) if shaft == sid(1)
        ));
        // a side this gear wrote itself is fine
        assert_eq!(g.resolve(mul, &s).unwrap(), Resolution::Idle);

        s[2].resolve_by(mul, 3.0);
        let mut d = Device::differential(sid(0), sid(1), sid(2));
        assert!(d.resolve(did(), &s).is_err());
        assert_eq!(d.resolve(mul, &s).unwrap(), Resolution::Idle);
    }

    #[test]
    fn integrator_uses_committed_integrand() {
        let mut integrator = Integrator::new(sid(0), sid(1), sid(2)).with_initial_position(2.0);
        let mut s = shafts(&[Some(0.1), None, None]);
        s[1] = ShaftState::at(0.5);
        // integrand also resolved this tick; only its committed value counts
        s[1].resolve(100.0);

        let mut dev = Device::from(integrator.clone());
        let (shaft, v) = written(dev.resolve(did(), &s).unwrap());
        assert_eq!(shaft, sid(2));
        assert!((v - 2.5 * 0.1).abs() < 1e-12);

        dev.commit(&s);
        let Device::Integrator(after) = &dev else {
            unreachable!()
        };
        assert_eq!(after.disk_position(), 2.5);

        integrator.reversed = true;
        let mut dev = Device::from(integrator);
        let (_, v) = written(dev.resolve(did(), &s).unwrap());
        assert!((v + 0.25).abs() < 1e-12);
    }

    #[test]
    fn integrator_and_table_report_ready_output_first() {
        let mut dev = Device::from(Integrator::new(sid(0), sid(1), sid(2)));
        let s = shafts(&[None, None, Some(0.7)]);
        assert_eq!(dev.resolve(did(), &s).unwrap(), Resolution::Unchanged(sid(2)));

        let mut dev = Device::from(FunctionTable::new(sid(0), sid(1), TransferFn::Constant(1.0)));
        let s = shafts(&[None, Some(0.7)]);
        assert_eq!(dev.resolve(did(), &s).unwrap(), Resolution::Unchanged(sid(1)));
    }

    #[test]
    fn integrator_rollback_keeps_disk() {
        let mut dev = Device::from(Integrator::new(sid(0), sid(1), sid(2)));
        let mut s = shafts(&[Some(1.0), None, None]);
        s[1] = ShaftState::at(3.0);
        dev.resolve(did(), &s).unwrap();
        dev.rollback();
        dev.commit(&s);
        let Device::Integrator(i) = &dev else {
            unreachable!()
        };
        assert_eq!(i.disk_position(), 0.0);
    }

    #[test]
    fn function_table_outputs_change_in_value() {
        let mut dev = Device::from(FunctionTable::new(
            sid(0),
            sid(1),
            TransferFn::Native(|x| x * x),
        ));
        let s = shafts(&[Some(1.0), None]);
        let (_, v) = written(dev.resolve(did(), &s).unwrap());
        assert_eq!(v, 1.0);
        dev.commit(&s);
        let (_, v) = written(dev.resolve(did(), &s).unwrap());
        assert_eq!(v, 3.0);
    }

    #[test]
    fn connections_follow_port_shape() {
        let devices = [
            Device::motor(sid(0), 1.0),
            Device::gear(sid(0), sid(1)),
            Device::differential(sid(0), sid(1), sid(2)),
            Device::from(Integrator::new(sid(0), sid(1), sid(2))),
            Device::from(Dial::new(sid(0))),
        ];
        for d in devices {
            let roles: Vec<_> = d.connections().into_iter().map(|(_, r)| r).collect();
            assert_eq!(roles, d.kind().port_shape());
        }
    }

    #[test]
    fn zero_gear_factor_rejected() {
        assert!(Device::gear_pair(sid(0), sid(1), 0.0).check_parameters().is_err());
        assert!(Device::motor(sid(0), f64::NAN).check_parameters().is_err());
        assert!(Device::multiplier(sid(0), sid(1), 0.0).check_parameters().is_ok());
    }
}
