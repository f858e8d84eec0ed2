use std::cmp::Ordering;
use std::ops::{Div, Mul};
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::coefficient::Coefficient;

use super::polynomial::MultivariatePolynomial;
use super::{Variable, INLINED_EXPONENTS};

/// A single term of a polynomial. Equality and ordering only consider the exponents.
#[derive(Debug, Clone)]
pub struct Monomial {
    pub coefficient: Coefficient,
    pub exponents: SmallVec<[u32; INLINED_EXPONENTS]>,
}

impl Monomial {
    #[inline]
    pub fn new(coefficient: Coefficient, exponents: SmallVec<[u32; INLINED_EXPONENTS]>) -> Monomial {
        Monomial {
            coefficient,
            exponents,
        }
    }

    /// The monomial `1` in `nvars` variables.
    pub fn one(nvars: usize) -> Monomial {
        Monomial {
            coefficient: Coefficient::one(),
            exponents: smallvec![0; nvars],
        }
    }

    /// Returns `true` if the monomial has no variable factors.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    /// Check if `other` divides `self`. Only the exponents are compared, as
    /// every non-zero coefficient is a unit.
    #[inline]
    pub fn is_divisible_by(&self, other: &Monomial) -> bool {
        self.exponents
            .iter()
            .zip(&other.exponents)
            .all(|(a, b)| a >= b)
    }

    /// Returns `true` if `self` and `other` have no variable in common.
    #[inline]
    pub fn is_coprime(&self, other: &Monomial) -> bool {
        self.exponents
            .iter()
            .zip(&other.exponents)
            .all(|(a, b)| *a == 0 || *b == 0)
    }

    /// The greatest common divisor of the exponents, with coefficient 1.
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        Monomial {
            coefficient: Coefficient::one(),
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.min(b))
                .collect(),
        }
    }

    /// The least common multiple of the exponents, with coefficient 1.
    pub fn lcm(&self, other: &Monomial) -> Monomial {
        Monomial {
            coefficient: Coefficient::one(),
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.max(b))
                .collect(),
        }
    }

    pub fn total_degree(&self) -> u64 {
        self.exponents.iter().map(|e| *e as u64).sum()
    }

    /// The variables with a positive exponent and their exponents, most significant first.
    pub fn powers<'a>(&'a self, variables: &'a [Variable]) -> impl Iterator<Item = (&'a Variable, u32)> + 'a {
        variables
            .iter()
            .zip(&self.exponents)
            .filter(|(_, e)| **e > 0)
            .map(|(v, e)| (v, *e))
    }

    /// Convert the monomial to a polynomial in `variables`.
    pub fn to_polynomial(&self, variables: Arc<Vec<Variable>>) -> MultivariatePolynomial {
        debug_assert_eq!(variables.len(), self.exponents.len());
        MultivariatePolynomial::new(Some(1), variables)
            .monomial(self.coefficient.clone(), self.exponents.to_vec())
    }
}

impl PartialEq for Monomial {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.exponents == other.exponents
    }
}

impl Eq for Monomial {}

impl PartialOrd for Monomial {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The lexicographic order: the first variable is the most significant
/// and a constant is smaller than any other monomial.
impl Ord for Monomial {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.exponents.cmp(&other.exponents)
    }
}

impl<'a> Div<&'a Monomial> for Monomial {
    type Output = Self;

    /// Divide by a monomial that divides `self`.
    ///
    /// Panics when `other` does not divide `self`.
    fn div(mut self, other: &Self) -> Self::Output {
        for (ee, er) in self.exponents.iter_mut().zip(&other.exponents) {
            if *ee < *er {
                panic!("Cannot divide monomials with exponents smaller than the divisor");
            }
            *ee -= *er;
        }

        self.coefficient = self.coefficient.div(&other.coefficient);
        self
    }
}

impl<'a> Mul<&'a Monomial> for Monomial {
    type Output = Self;

    fn mul(mut self, other: &Self) -> Self::Output {
        for (ee, er) in self.exponents.iter_mut().zip(&other.exponents) {
            *ee = ee.checked_add(*er).expect("overflow in adding exponents");
        }

        self.coefficient = self.coefficient.mul(&other.coefficient);
        self
    }
}

#[cfg(test)]
mod test {
    use crate::coefficient::Coefficient;

    use super::Monomial;

    fn m(c: i64, e: &[u32]) -> Monomial {
        Monomial::new(Coefficient::from(c), e.iter().cloned().collect())
    }

    #[test]
    fn lex_order() {
        // x > y^5 when x is the first variable
        assert!(m(1, &[1, 0]) > m(1, &[0, 5]));
        assert!(m(1, &[1, 1]) > m(1, &[1, 0]));
        assert!(m(1, &[0, 0]) < m(1, &[0, 1]));
        // coefficients are not part of the order
        assert_eq!(m(3, &[2, 1]), m(-1, &[2, 1]));
    }

    #[test]
    fn gcd_lcm_divide() {
        let a = m(2, &[2, 1, 0]);
        let b = m(3, &[1, 3, 1]);
        assert_eq!(a.gcd(&b).exponents.as_slice(), &[1, 1, 0]);
        assert_eq!(a.lcm(&b).exponents.as_slice(), &[2, 3, 1]);
        assert!(a.lcm(&b).is_divisible_by(&a));
        assert!(!a.is_divisible_by(&b));
        assert!(m(1, &[1, 0]).is_coprime(&m(1, &[0, 4])));

        let q = a.clone() / &m(4, &[1, 1, 0]);
        assert_eq!(q.exponents.as_slice(), &[1, 0, 0]);
        assert_eq!(q.coefficient, Coefficient::new(1, 2));
        assert_eq!((q * &m(4, &[1, 1, 0])).coefficient, a.coefficient);
    }

    #[test]
    #[should_panic]
    fn divide_by_non_divisor() {
        let _ = m(1, &[1, 0]) / &m(1, &[0, 1]);
    }
}
