//! Builtin constants and functions.

use da_core::Real;

/// Named constants visible to every expression unless shadowed by a binding.
pub const CONSTANTS: [(&str, Real); 4] = [
    ("e", core::f64::consts::E),
    ("pi", core::f64::consts::PI),
    ("tau", core::f64::consts::TAU),
    // golden ratio
    ("phi", 1.618_033_988_749_895),
];

pub fn lookup_constant(name: &str) -> Option<Real> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, v)| v)
}

/// A builtin function with its declared arity.
#[derive(Clone, Copy)]
pub enum Builtin {
    Unary(fn(Real) -> Real),
    Binary(fn(Real, Real) -> Real),
}

impl Builtin {
    pub fn arity(self) -> usize {
        match self {
            Builtin::Unary(_) => 1,
            Builtin::Binary(_) => 2,
        }
    }

    /// Apply to already-evaluated arguments. Callers check arity first.
    pub fn call(self, args: &[Real]) -> Option<Real> {
        match (self, args) {
            (Builtin::Unary(f), [x]) => Some(f(*x)),
            (Builtin::Binary(f), [a, b]) => Some(f(*a, *b)),
            _ => None,
        }
    }
}

impl core::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Builtin/{}", self.arity())
    }
}

fn sign(x: Real) -> Real {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // signed zero and NaN pass through
        x
    }
}

fn min(a: Real, b: Real) -> Real {
    if a.is_nan() || b.is_nan() {
        return Real::NAN;
    }
    a.min(b)
}

fn max(a: Real, b: Real) -> Real {
    if a.is_nan() || b.is_nan() {
        return Real::NAN;
    }
    a.max(b)
}

/// `log(base, x)`
fn log(base: Real, x: Real) -> Real {
    x.ln() / base.ln()
}

pub fn lookup_function(name: &str) -> Option<Builtin> {
    use Builtin::{Binary, Unary};

    let f = match name {
        "abs" => Unary(Real::abs),
        "acos" => Unary(Real::acos),
        "acosh" => Unary(Real::acosh),
        "acot" => Unary(|x| (1.0 / x).atan()),
        "acoth" => Unary(|x| (1.0 / x).atanh()),
        "acsc" => Unary(|x| (1.0 / x).asin()),
        "acsch" => Unary(|x| (1.0 / x).asinh()),
        "asec" => Unary(|x| (1.0 / x).acos()),
        "asech" => Unary(|x| (1.0 / x).acosh()),
        "asin" => Unary(Real::asin),
        "asinh" => Unary(Real::asinh),
        "atan" => Unary(Real::atan),
        "atan2" => Binary(Real::atan2),
        "atanh" => Unary(Real::atanh),
        "ceil" => Unary(Real::ceil),
        "cos" => Unary(Real::cos),
        "cosh" => Unary(Real::cosh),
        "cot" => Unary(|x| 1.0 / x.tan()),
        "coth" => Unary(|x| 1.0 / x.tanh()),
        "csc" => Unary(|x| 1.0 / x.sin()),
        "csch" => Unary(|x| 1.0 / x.sinh()),
        "deg" => Unary(Real::to_degrees),
        "exp" => Unary(Real::exp),
        "floor" => Unary(Real::floor),
        "ln" => Unary(Real::ln),
        "log" => Binary(log),
        "max" => Binary(max),
        "min" => Binary(min),
        "rad" => Unary(Real::to_radians),
        "sec" => Unary(|x| 1.0 / x.cos()),
        "sech" => Unary(|x| 1.0 / x.cosh()),
        "sign" => Unary(sign),
        "sin" => Unary(Real::sin),
        "sinh" => Unary(Real::sinh),
        "tan" => Unary(Real::tan),
        "tanh" => Unary(Real::tanh),
        "trunc" => Unary(Real::trunc),
        _ => return None,
    };
    Some(f)
}
