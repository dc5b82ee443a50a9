//! Expression tree.

use core::fmt;

use da_core::{nearly_equal, Real, Tolerances};

/// Tolerance used by `==` and `!=`.
pub const EQUALITY_TOLERANCE: Tolerances = Tolerances::absolute(1e-8);

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
}

impl UnaryOp {
    pub fn apply(self, v: Real) -> Real {
        match self {
            UnaryOp::Plus => v,
            UnaryOp::Neg => -v,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
        }
    }
}

/// Infix operators. Comparisons yield `1.0` for true and `0.0` for false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn apply(self, a: Real, b: Real) -> Real {
        let truth = |c: bool| if c { 1.0 } else { 0.0 };
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            BinaryOp::Pow => a.powf(b),
            BinaryOp::Lt => truth(a < b),
            BinaryOp::Gt => truth(a > b),
            BinaryOp::LtEq => truth(a <= b),
            BinaryOp::GtEq => truth(a >= b),
            BinaryOp::Eq => truth(nearly_equal(a, b, EQUALITY_TOLERANCE)),
            BinaryOp::NotEq => truth(!nearly_equal(a, b, EQUALITY_TOLERANCE)),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        }
    }
}

/// Kind of a quantified expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Sum,
    Product,
}

impl Quantifier {
    /// Neutral element the fold starts from.
    pub fn identity(self) -> Real {
        match self {
            Quantifier::Sum => 0.0,
            Quantifier::Product => 1.0,
        }
    }

    pub fn combine(self, acc: Real, v: Real) -> Real {
        match self {
            Quantifier::Sum => acc + v,
            Quantifier::Product => acc * v,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Quantifier::Sum => "sum",
            Quantifier::Product => "product",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Sum => write!(f, "summation"),
            Quantifier::Product => write!(f, "product"),
        }
    }
}

/// Parsed expression. Immutable once built; `Let::cons` chains are linear.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Real),
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// `sum(index = start, end, body)` / `product(...)`, inclusive, step ±1.
    Quantified {
        kind: Quantifier,
        index: String,
        start: Box<Expr>,
        end: Box<Expr>,
        body: Box<Expr>,
    },
    /// `name = value; cons`
    Let {
        name: String,
        value: Box<Expr>,
        cons: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    pub fn let_in(name: impl Into<String>, value: Expr, cons: Expr) -> Self {
        Expr::Let {
            name: name.into(),
            value: Box::new(value),
            cons: Box::new(cons),
        }
    }

    /// The literal value, if this node is fully reduced.
    pub fn as_lit(&self) -> Option<Real> {
        match self {
            Expr::Lit(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(v) => write!(f, "{v}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Unary { op, operand } => write!(f, "{}{}", op.symbol(), operand),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Quantified {
                kind,
                index,
                start,
                end,
                body,
            } => write!(f, "{}({index} = {start}, {end}, {body})", kind.keyword()),
            Expr::Let { name, value, cons } => write!(f, "{name} = {value}; {cons}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_yield_truth_values() {
        assert_eq!(BinaryOp::Lt.apply(1.0, 2.0), 1.0);
        assert_eq!(BinaryOp::Gt.apply(1.0, 2.0), 0.0);
        assert_eq!(BinaryOp::GtEq.apply(1.0, 1.0), 1.0);
        assert_eq!(BinaryOp::Eq.apply(0.1 + 0.2, 0.3), 1.0);
        assert_eq!(BinaryOp::NotEq.apply(1.0, 1.0 + 1e-6), 1.0);
    }

    #[test]
    fn remainder_truncates_toward_zero() {
        assert_eq!(BinaryOp::Rem.apply(7.0, 3.0), 1.0);
        assert_eq!(BinaryOp::Rem.apply(-7.0, 3.0), -1.0);
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let e = Expr::binary(
            BinaryOp::Add,
            Expr::Lit(5.0),
            Expr::binary(BinaryOp::Mul, Expr::var("x"), Expr::Lit(7.0)),
        );
        assert_eq!(e.to_string(), "(5 + (x * 7))");
        assert_eq!(
            Expr::call("atan2", vec![Expr::var("y"), Expr::Lit(1.0)]).to_string(),
            "atan2(y, 1)"
        );
    }
}
