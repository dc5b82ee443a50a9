//! Transfer functions for function tables.

use da_core::Real;
use da_expr::{Bindings, Compiled, ExprResult};

/// Name of the free variable a table's expression is written in.
pub const TABLE_VARIABLE: &str = "x";

/// `y = f(x)` as traced by a function table.
#[derive(Debug, Clone)]
pub enum TransferFn {
    Constant(Real),
    Native(fn(Real) -> Real),
    /// Compiled expression in [`TABLE_VARIABLE`], evaluated per tick.
    Expression { compiled: Compiled, scratch: Bindings },
}

impl TransferFn {
    /// Wrap a compiled expression, folding it to a constant when possible.
    pub fn from_compiled(compiled: Compiled) -> Self {
        match compiled.constant() {
            Some(v) => TransferFn::Constant(v),
            None => TransferFn::Expression {
                compiled,
                scratch: Bindings::new(),
            },
        }
    }

    pub fn eval(&mut self, x: Real) -> ExprResult<Real> {
        match self {
            TransferFn::Constant(v) => Ok(*v),
            TransferFn::Native(f) => Ok(f(x)),
            TransferFn::Expression { compiled, scratch } => {
                scratch.insert(TABLE_VARIABLE.to_string(), x);
                compiled.call(scratch)
            }
        }
    }
}
