//! da-sim: runtime for differential analyzer machines.
//!
//! A machine is a set of shafts joined by devices. One motor drives one
//! shaft; every tick, readiness floods outward from it through the devices,
//! each shaft is resolved at most once, and then all shafts commit together.
//!
//! # Example
//!
//! ```
//! use da_graph::Orientation;
//! use da_sim::{Device, OutputTable, SimulatorBuilder};
//!
//! let mut b = SimulatorBuilder::new();
//! let drive = b.add_shaft("drive", Orientation::Horizontal);
//! let doubled = b.add_shaft("doubled", Orientation::Horizontal);
//! b.add("motor", Device::motor(drive, 0.5));
//! b.add("x2", Device::multiplier(drive, doubled, 2.0));
//! b.add("table", OutputTable::new(drive, doubled, None));
//!
//! let mut sim = b.build().unwrap();
//! sim.run(4).unwrap();
//!
//! let table = sim.output_table(0).unwrap();
//! assert_eq!(table.x_history(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
//! assert_eq!(table.y1_history().last(), Some(&4.0));
//! ```

pub mod builder;
pub mod clock;
pub mod device;
pub mod error;
pub mod runner;
pub mod shaft;
pub mod simulator;
pub mod sinks;
pub mod transfer;

pub use builder::SimulatorBuilder;
pub use clock::SimulationClock;
pub use device::{Device, FunctionTable, Integrator, Resolution};
pub use error::{SimError, SimResult};
pub use runner::{RunState, SimulationRunner};
pub use shaft::ShaftState;
pub use simulator::Simulator;
pub use sinks::{Dial, OutputTable};
pub use transfer::TransferFn;
