//! Compiling expression strings against known constants, and resolving
//! `let` chains into named values.

use da_core::Real;
use tracing::debug;

use crate::ast::Expr;
use crate::error::{ExprError, ExprResult};
use crate::eval::{eval, partial_eval, Bindings, Unknowns};
use crate::parser::parse;

/// Result of compiling an expression: a constant, or a residual tree that
/// still needs per-call bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Constant(Real),
    Residual { expr: Expr, free: Unknowns },
}

impl Compiled {
    /// Evaluate with per-call bindings (ignored for constants).
    pub fn call(&self, bindings: &Bindings) -> ExprResult<Real> {
        match self {
            Compiled::Constant(v) => Ok(*v),
            Compiled::Residual { expr, .. } => eval(expr, bindings),
        }
    }

    pub fn constant(&self) -> Option<Real> {
        match self {
            Compiled::Constant(v) => Some(*v),
            Compiled::Residual { .. } => None,
        }
    }

    /// Names a call still has to supply.
    pub fn free_variables(&self) -> Unknowns {
        match self {
            Compiled::Constant(_) => Unknowns::new(),
            Compiled::Residual { free, .. } => free.clone(),
        }
    }
}

/// Parse `src`, fold everything `bindings` determines, and return what is left.
pub fn compile(src: &str, bindings: &Bindings) -> ExprResult<Compiled> {
    let (expr, free) = partial_eval(&parse(src)?, bindings)?;
    let compiled = match expr {
        Expr::Lit(v) => Compiled::Constant(v),
        expr => Compiled::Residual { expr, free },
    };
    debug!(src, free = ?compiled.free_variables(), "compiled expression");
    Ok(compiled)
}

/// Values produced by walking a `let` chain binding by binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetChain {
    /// In source order. A rebinding appears twice; the later one wins in
    /// [`LetChain::to_bindings`].
    pub values: Vec<(String, Real)>,
    /// Value of the trailing expression; `0` when the chain ends on a binding.
    pub result: Real,
}

impl LetChain {
    pub fn to_bindings(&self) -> Bindings {
        self.values.iter().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<Real> {
        self.values
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }
}

/// Resolve a block of `name = expr` statements in order.
///
/// Each value may use `base` and every earlier binding. The first binding
/// that does not reduce to a number stops resolution with
/// [`ExprError::UnresolvedBinding`]. Blank input resolves to nothing.
pub fn resolve_let_chain(src: &str, base: &Bindings) -> ExprResult<LetChain> {
    if src.trim().is_empty() {
        return Ok(LetChain::default());
    }

    let mut scope = base.clone();
    let mut chain = LetChain::default();
    let mut node = parse(src)?;

    loop {
        match node {
            Expr::Let { name, value, cons } => {
                let (reduced, missing) = partial_eval(&value, &scope)?;
                let Some(v) = reduced.as_lit() else {
                    return Err(ExprError::UnresolvedBinding {
                        name,
                        missing: missing.into_iter().collect(),
                    });
                };
                scope.insert(name.clone(), v);
                chain.values.push((name, v));
                node = *cons;
            }
            tail => {
                chain.result = eval(&tail, &scope)?;
                return Ok(chain);
            }
        }
    }
}
