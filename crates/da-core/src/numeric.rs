use crate::DaError;

/// Floating point type used for every shaft rotation and expression value
pub type Real = f64;

/// Absolute + relative tolerance pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Purely absolute tolerance, as used by expression equality.
    pub const fn absolute(abs: Real) -> Self {
        Self { abs, rel: 0.0 }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DaError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DaError::NonFinite { what, value: v })
    }
}

/// True when `v` is finite and has no fractional part.
pub fn is_integral(v: Real) -> bool {
    v.is_finite() && v.fract() == 0.0
}
