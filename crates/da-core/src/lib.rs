//! da-core: stable foundation for the differential analyzer.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for shafts, devices and ports)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DaError, DaResult};
pub use ids::*;
pub use numeric::*;
