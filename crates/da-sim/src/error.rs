//! Error types for simulation operations.

use da_core::{DaError, DeviceId, ShaftId};
use da_expr::ExprError;
use da_graph::GraphError;
use thiserror::Error;

/// Errors encountered while building or stepping a machine.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Two devices resolved the same shaft within one tick.
    #[error("Shaft {shaft} resolved twice in one tick (second write by device {device})")]
    DuplicateResolution { shaft: ShaftId, device: DeviceId },

    #[error("Transfer function of device {device} failed: {source}")]
    Expression {
        device: DeviceId,
        #[source]
        source: ExprError,
    },

    #[error("Topology error: {0}")]
    Topology(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] DaError),
}

pub type SimResult<T> = Result<T, SimError>;
