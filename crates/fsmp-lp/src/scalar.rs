//! Ordered fields the simplex tableau can run over.

use std::cmp::Ordering;
use std::fmt;

use num::{BigInt, BigRational, Signed, ToPrimitive, Zero};

/// Arithmetic and sign tests needed by the simplex method.
///
/// Sign tests are tolerance-aware for inexact fields: anything within
/// [`Scalar::TOLERANCE`] of zero counts as zero. Exact fields use a
/// tolerance of zero.
pub trait Scalar: Clone + fmt::Debug + Send + Sync + 'static {
    const EXACT: bool;
    const TOLERANCE: f64;

    fn zero() -> Self;
    fn from_i64(value: i64) -> Self;
    fn plus(&self, rhs: &Self) -> Self;
    fn minus(&self, rhs: &Self) -> Self;
    fn times(&self, rhs: &Self) -> Self;
    /// Division; callers never divide by a value whose sign is zero.
    fn over(&self, rhs: &Self) -> Self;
    fn sign(&self) -> Ordering;
    fn to_f64(&self) -> f64;

    fn is_zero(&self) -> bool {
        self.sign() == Ordering::Equal
    }

    fn is_positive(&self) -> bool {
        self.sign() == Ordering::Greater
    }

    fn is_negative(&self) -> bool {
        self.sign() == Ordering::Less
    }

    fn less_than(&self, rhs: &Self) -> bool {
        rhs.minus(self).is_positive()
    }
}

impl Scalar for f64 {
    const EXACT: bool = false;
    const TOLERANCE: f64 = 1e-9;

    fn zero() -> Self {
        0.0
    }

    fn from_i64(value: i64) -> Self {
        value as f64
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn over(&self, rhs: &Self) -> Self {
        self / rhs
    }

    fn sign(&self) -> Ordering {
        if *self > Self::TOLERANCE {
            Ordering::Greater
        } else if *self < -Self::TOLERANCE {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    fn to_f64(&self) -> f64 {
        *self
    }
}

impl Scalar for BigRational {
    const EXACT: bool = true;
    const TOLERANCE: f64 = 0.0;

    fn zero() -> Self {
        Zero::zero()
    }

    fn from_i64(value: i64) -> Self {
        BigRational::from_integer(BigInt::from(value))
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn over(&self, rhs: &Self) -> Self {
        self / rhs
    }

    fn sign(&self) -> Ordering {
        if Signed::is_positive(self) {
            Ordering::Greater
        } else if Signed::is_negative(self) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    fn to_f64(&self) -> f64 {
        ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
    }
}
