//! Exact rational numbers, used both as numeric leaves of expressions
//! and as polynomial coefficients.

use std::cmp::Ordering;
use std::fmt::Display;

use rug::{Complete, Integer as ArbitraryPrecisionInteger, Rational as ArbitraryPrecisionRational};

use crate::utils;

/// A rational number. Values that fit in a pair of `i64` are always stored as
/// `Natural` in lowest terms with a positive denominator; only larger values use
/// the arbitrary precision representation. This makes the derived equality and
/// hashing exact.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Coefficient {
    Natural(i64, i64),
    Large(ArbitraryPrecisionRational),
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::Natural(n, 1)
    }
}

impl From<i32> for Coefficient {
    fn from(n: i32) -> Self {
        Coefficient::Natural(n as i64, 1)
    }
}

impl From<ArbitraryPrecisionRational> for Coefficient {
    fn from(r: ArbitraryPrecisionRational) -> Self {
        if let (Some(n), Some(d)) = (r.numer().to_i64(), r.denom().to_i64()) {
            Coefficient::Natural(n, d)
        } else {
            Coefficient::Large(r)
        }
    }
}

impl Display for Coefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coefficient::Natural(n, d) => {
                if *d == 1 {
                    f.write_fmt(format_args!("{}", n))
                } else {
                    f.write_fmt(format_args!("{}/{}", n, d))
                }
            }
            Coefficient::Large(r) => r.fmt(f),
        }
    }
}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coefficient::Natural(n1, d1), Coefficient::Natural(n2, d2)) => {
                (*n1 as i128 * *d2 as i128).cmp(&(*n2 as i128 * *d1 as i128))
            }
            _ => self.to_large().cmp(&other.to_large()),
        }
    }
}

impl Coefficient {
    /// Create the fraction `num/den`. Panics when `den` is zero.
    pub fn new(num: i64, den: i64) -> Coefficient {
        Self::from_i128(num as i128, den as i128)
    }

    fn from_i128(mut num: i128, mut den: i128) -> Coefficient {
        if den == 0 {
            panic!("Division by zero in coefficient");
        }

        if den < 0 {
            num = -num;
            den = -den;
        }

        let g = utils::gcd_signed_i128(num, den) as i128;
        if g > 1 {
            num /= g;
            den /= g;
        }

        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(n), Ok(d)) => Coefficient::Natural(n, d),
            _ => Coefficient::Large(ArbitraryPrecisionRational::from((
                ArbitraryPrecisionInteger::from(num),
                ArbitraryPrecisionInteger::from(den),
            ))),
        }
    }

    /// Parse a string of decimal digits, with an optional leading minus sign.
    pub fn parse_integer(s: &str) -> Result<Coefficient, String> {
        if let Ok(x) = s.parse::<i64>() {
            return Ok(Coefficient::Natural(x, 1));
        }

        match ArbitraryPrecisionInteger::parse(s) {
            Ok(x) => {
                let i: ArbitraryPrecisionInteger = x.complete();
                Ok(ArbitraryPrecisionRational::from(i).into())
            }
            Err(e) => Err(format!("Could not parse number {}: {}", s, e)),
        }
    }

    pub fn to_large(&self) -> ArbitraryPrecisionRational {
        match self {
            Coefficient::Natural(n, d) => ArbitraryPrecisionRational::from((*n, *d)),
            Coefficient::Large(r) => r.clone(),
        }
    }

    #[inline]
    pub fn zero() -> Coefficient {
        Coefficient::Natural(0, 1)
    }

    #[inline]
    pub fn one() -> Coefficient {
        Coefficient::Natural(1, 1)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Coefficient::Natural(0, _))
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Coefficient::Natural(1, 1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Coefficient::Natural(n, _) => *n < 0,
            Coefficient::Large(r) => *r < 0,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Coefficient::Natural(_, d) => *d == 1,
            Coefficient::Large(r) => r.is_integer(),
        }
    }

    /// Get the value as an `i64`, if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Coefficient::Natural(n, 1) => Some(*n),
            _ => None,
        }
    }

    /// Get the numerator and denominator, if both fit in an `i64`.
    pub fn to_fraction(&self) -> Option<(i64, i64)> {
        match self {
            Coefficient::Natural(n, d) => Some((*n, *d)),
            Coefficient::Large(_) => None,
        }
    }

    pub fn add(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Natural(n1, d1), Coefficient::Natural(n2, d2)) => Self::from_i128(
                *n1 as i128 * *d2 as i128 + *n2 as i128 * *d1 as i128,
                *d1 as i128 * *d2 as i128,
            ),
            _ => ArbitraryPrecisionRational::from(&self.to_large() + &other.to_large()).into(),
        }
    }

    pub fn sub(&self, other: &Coefficient) -> Coefficient {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Natural(n1, d1), Coefficient::Natural(n2, d2)) => Self::from_i128(
                *n1 as i128 * *n2 as i128,
                *d1 as i128 * *d2 as i128,
            ),
            _ => ArbitraryPrecisionRational::from(&self.to_large() * &other.to_large()).into(),
        }
    }

    /// Divide by `other`. Panics when `other` is zero.
    pub fn div(&self, other: &Coefficient) -> Coefficient {
        self.mul(&other.inv())
    }

    pub fn neg(&self) -> Coefficient {
        match self {
            Coefficient::Natural(n, d) => Self::from_i128(-(*n as i128), *d as i128),
            Coefficient::Large(r) => ArbitraryPrecisionRational::from(-r).into(),
        }
    }

    /// The multiplicative inverse. Panics when `self` is zero.
    pub fn inv(&self) -> Coefficient {
        match self {
            Coefficient::Natural(n, d) => Self::from_i128(*d as i128, *n as i128),
            Coefficient::Large(r) => r.clone().recip().into(),
        }
    }

    /// Raise to a non-negative integer power using repeated squaring.
    pub fn pow(&self, mut e: u64) -> Coefficient {
        let mut base = self.clone();
        let mut result = Coefficient::one();
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base);
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::Coefficient;

    #[test]
    fn normalization() {
        assert_eq!(Coefficient::new(2, -4), Coefficient::new(-1, 2));
        assert!(Coefficient::new(0, 5).is_zero());
        assert!(Coefficient::new(3, 3).is_one());
    }

    #[test]
    fn arithmetic() {
        let a = Coefficient::new(1, 2);
        let b = Coefficient::new(1, 3);
        assert_eq!(a.add(&b), Coefficient::new(5, 6));
        assert_eq!(a.sub(&b), Coefficient::new(1, 6));
        assert_eq!(a.mul(&b), Coefficient::new(1, 6));
        assert_eq!(a.div(&b), Coefficient::new(3, 2));
        assert_eq!(b.inv(), Coefficient::from(3));
        assert_eq!(Coefficient::new(-2, 3).pow(3), Coefficient::new(-8, 27));
    }

    #[test]
    fn overflow_promotes_and_demotes() {
        let big = Coefficient::from(i64::MAX);
        let sq = big.mul(&big);
        assert!(matches!(sq, Coefficient::Large(_)));
        assert_eq!(sq.div(&big), big);
        assert!(matches!(sq.div(&big), Coefficient::Natural(_, _)));
    }

    #[test]
    fn parse_and_order() {
        let n = Coefficient::parse_integer("123456789012345678901234567890").unwrap();
        assert!(matches!(n, Coefficient::Large(_)));
        assert!(n > Coefficient::from(5));
        assert!(Coefficient::new(-1, 2) < Coefficient::new(1, 3));
        assert_eq!(n.to_string(), "123456789012345678901234567890");
    }
}
