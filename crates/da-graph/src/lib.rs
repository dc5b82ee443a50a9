//! da-graph: machine topology for the differential analyzer.
//!
//! Provides:
//! - Core topology data structures (Shaft, Device, Port, Graph)
//! - Incremental builder with build-time validation
//! - Shaft -> device adjacency used by propagation
//! - Mapping from external shaft keys to arena ids
//!
//! # Example
//!
//! ```
//! use da_graph::{DeviceKind, GraphBuilder, Orientation, PortRole};
//!
//! let mut builder = GraphBuilder::new();
//! let drive = builder.add_shaft("drive", Orientation::Horizontal);
//! let out = builder.add_shaft("out", Orientation::Vertical);
//! builder.add_device("motor", DeviceKind::Motor, &[(drive, PortRole::Output)]);
//! builder.add_device(
//!     "x2",
//!     DeviceKind::Multiplier,
//!     &[(drive, PortRole::Input), (out, PortRole::Output)],
//! );
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.shafts().len(), 2);
//! assert_eq!(graph.devices().len(), 2);
//! assert_eq!(graph.reactive_devices(drive).count(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Device, DeviceKind, Graph, Orientation, Port, PortRole, Shaft};
pub use indexing::ShaftIndex;
