//! Evaluation and partial evaluation.
//!
//! [`partial_eval`] folds every subtree whose inputs are known and leaves a
//! residual tree behind for the rest, reporting the names it could not bind.
//! [`eval`] is partial evaluation that insists on a literal result.

use std::collections::{BTreeSet, HashMap};

use da_core::{is_integral, Real};

use crate::ast::{Expr, Quantifier};
use crate::builtins::{lookup_constant, lookup_function};
use crate::error::{ExprError, ExprResult};
use crate::parser::parse;

/// Caller supplied variable values. Shadow the builtin constants.
pub type Bindings = HashMap<String, Real>;

/// Names an expression still depends on, sorted for stable messages.
pub type Unknowns = BTreeSet<String>;

/// Lookup chain: `let`/index locals (innermost last), then bindings, then constants.
struct Env<'a> {
    bindings: &'a Bindings,
    /// `None` shadows an outer value with an unresolved local.
    locals: Vec<(String, Option<Real>)>,
}

impl<'a> Env<'a> {
    fn new(bindings: &'a Bindings) -> Self {
        Self {
            bindings,
            locals: Vec::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<Real> {
        if let Some((_, local)) = self.locals.iter().rev().find(|(n, _)| n == name) {
            return *local;
        }
        self.bindings
            .get(name)
            .copied()
            .or_else(|| lookup_constant(name))
    }

    fn scoped<T>(&mut self, name: &str, value: Option<Real>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.locals.push((name.to_string(), value));
        let out = f(self);
        self.locals.pop();
        out
    }
}

/// Reduce `expr` as far as `bindings` allow.
pub fn partial_eval(expr: &Expr, bindings: &Bindings) -> ExprResult<(Expr, Unknowns)> {
    let mut env = Env::new(bindings);
    reduce(expr, &mut env)
}

/// Evaluate `expr` to a number; any unbound name is an error.
pub fn eval(expr: &Expr, bindings: &Bindings) -> ExprResult<Real> {
    let (reduced, unknowns) = partial_eval(expr, bindings)?;
    finish(reduced, unknowns)
}

/// Parse and evaluate in one go.
pub fn eval_str(src: &str, bindings: &Bindings) -> ExprResult<Real> {
    eval(&parse(src)?, bindings)
}

fn finish(reduced: Expr, unknowns: Unknowns) -> ExprResult<Real> {
    match reduced {
        Expr::Lit(v) => Ok(v),
        _ => Err(ExprError::UndefinedVariables {
            names: unknowns.into_iter().collect(),
        }),
    }
}

fn reduce(expr: &Expr, env: &mut Env<'_>) -> ExprResult<(Expr, Unknowns)> {
    match expr {
        Expr::Lit(v) => Ok((Expr::Lit(*v), Unknowns::new())),

        Expr::Var(name) => match env.lookup(name) {
            Some(v) => Ok((Expr::Lit(v), Unknowns::new())),
            None => Ok((expr.clone(), Unknowns::from([name.clone()]))),
        },

        Expr::Unary { op, operand } => {
            let (operand, unknowns) = reduce(operand, env)?;
            let out = match operand.as_lit() {
                Some(v) => Expr::Lit(op.apply(v)),
                None => Expr::unary(*op, operand),
            };
            Ok((out, unknowns))
        }

        Expr::Binary { op, lhs, rhs } => {
            let (lhs, mut unknowns) = reduce(lhs, env)?;
            let (rhs, rhs_unknowns) = reduce(rhs, env)?;
            unknowns.extend(rhs_unknowns);
            let out = match (lhs.as_lit(), rhs.as_lit()) {
                (Some(a), Some(b)) => Expr::Lit(op.apply(a, b)),
                _ => Expr::binary(*op, lhs, rhs),
            };
            Ok((out, unknowns))
        }

        Expr::Call { name, args } => {
            let builtin = lookup_function(name).ok_or_else(|| ExprError::UnknownFunction {
                name: name.clone(),
            })?;
            if builtin.arity() != args.len() {
                return Err(ExprError::ArityMismatch {
                    name: name.clone(),
                    expected: builtin.arity(),
                    found: args.len(),
                });
            }

            let mut unknowns = Unknowns::new();
            let mut reduced = Vec::with_capacity(args.len());
            for arg in args {
                let (arg, arg_unknowns) = reduce(arg, env)?;
                unknowns.extend(arg_unknowns);
                reduced.push(arg);
            }

            let values: Option<Vec<Real>> = reduced.iter().map(Expr::as_lit).collect();
            let out = match values.and_then(|v| builtin.call(&v)) {
                Some(v) => Expr::Lit(v),
                None => Expr::call(name.clone(), reduced),
            };
            Ok((out, unknowns))
        }

        Expr::Quantified {
            kind,
            index,
            start,
            end,
            body,
        } => reduce_quantified(*kind, index, start, end, body, env),

        Expr::Let { name, value, cons } => {
            let (value, mut unknowns) = reduce(value, env)?;
            if let Some(v) = value.as_lit() {
                return env.scoped(name, Some(v), |env| reduce(cons, env));
            }

            let (cons, mut cons_unknowns) = env.scoped(name, None, |env| reduce(cons, env))?;
            cons_unknowns.remove(name);
            unknowns.extend(cons_unknowns);
            Ok((Expr::let_in(name.clone(), value, cons), unknowns))
        }
    }
}

/// Most terms a `sum` or `product` may expand to.
pub const MAX_TERMS: u64 = 1_000_000;

fn reduce_quantified(
    kind: Quantifier,
    index: &str,
    start: &Expr,
    end: &Expr,
    body: &Expr,
    env: &mut Env<'_>,
) -> ExprResult<(Expr, Unknowns)> {
    let (start, mut unknowns) = reduce(start, env)?;
    let (end, end_unknowns) = reduce(end, env)?;
    unknowns.extend(end_unknowns);
    let (body, mut body_unknowns) = env.scoped(index, None, |env| reduce(body, env))?;
    body_unknowns.remove(index);
    let body_ready = body_unknowns.is_empty();
    unknowns.extend(body_unknowns);

    let (Some(first), Some(last), true) = (start.as_lit(), end.as_lit(), body_ready) else {
        return Ok((
            Expr::Quantified {
                kind,
                index: index.to_string(),
                start: Box::new(start),
                end: Box::new(end),
                body: Box::new(body),
            },
            unknowns,
        ));
    };

    if !is_integral(first) || !is_integral(last) {
        return Err(ExprError::NonIntegerRange { kind });
    }

    let span = (last - first).abs();
    if span >= MAX_TERMS as Real {
        return Err(ExprError::RangeTooLarge {
            kind,
            limit: MAX_TERMS,
        });
    }
    let step = if first <= last { 1.0 } else { -1.0 };
    let count = span as u64 + 1;
    let mut acc = kind.identity();
    let mut i = first;
    for _ in 0..count {
        let (term, term_unknowns) = env.scoped(index, Some(i), |env| reduce(&body, env))?;
        acc = kind.combine(acc, finish(term, term_unknowns)?);
        i += step;
    }

    Ok((Expr::Lit(acc), Unknowns::new()))
}
