//! Rational functions: pairs of polynomials reduced to lowest terms.

use std::fmt::Display;

use ahash::{HashMap, HashMapExt};
use tracing::{debug, instrument};

use crate::atom::Atom;
use crate::state::State;

use super::gcd::poly_gcd;
use super::groebner::{quotients, GroebnerSettings};
use super::polynomial::MultivariatePolynomial;
use super::{opaque, PolyError, Variable};

/// A reversible map from opaque variables to temporary placeholders.
#[derive(Clone, Debug, Default)]
pub struct VariableMap {
    placeholders: HashMap<Variable, usize>,
    originals: HashMap<usize, Variable>,
}

impl VariableMap {
    pub fn new() -> VariableMap {
        VariableMap {
            placeholders: HashMap::new(),
            originals: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Replace every opaque variable of `p` by a placeholder. The same
    /// opaque variable always gets the same placeholder.
    pub fn replace(&mut self, p: &MultivariatePolynomial) -> MultivariatePolynomial {
        if !p.get_vars_ref().iter().any(|v| matches!(v, Variable::Opaque(_))) {
            return p.clone();
        }

        let vars: Vec<_> = p
            .get_vars_ref()
            .iter()
            .map(|v| match v {
                Variable::Opaque(_) => {
                    let index = *self.placeholders.entry(v.clone()).or_insert_with(|| {
                        let t = State::new_temporary();
                        self.originals.insert(t, v.clone());
                        t
                    });
                    Variable::Temporary(index)
                }
                v => v.clone(),
            })
            .collect();

        p.rename_variables(&vars)
    }

    /// Restore the original variables of the placeholders in `p`.
    pub fn restore(&self, p: &MultivariatePolynomial) -> MultivariatePolynomial {
        let mut changed = false;
        let vars: Vec<_> = p
            .get_vars_ref()
            .iter()
            .map(|v| match v {
                Variable::Temporary(t) => match self.originals.get(t) {
                    Some(o) => {
                        changed = true;
                        o.clone()
                    }
                    None => v.clone(),
                },
                v => v.clone(),
            })
            .collect();

        if changed {
            p.rename_variables(&vars)
        } else {
            p.clone()
        }
    }
}

/// Reduce `numerator / denominator` to lowest terms: both polynomials are divided by
/// `gcd * k`, where `k` is the leading coefficient of the denominator, so that the
/// new denominator is monic.
#[instrument(level = "debug", skip_all, fields(%numerator, %denominator))]
pub fn reduce_rational(
    numerator: &MultivariatePolynomial,
    denominator: &MultivariatePolynomial,
    settings: &GroebnerSettings,
) -> Result<(MultivariatePolynomial, MultivariatePolynomial), PolyError> {
    let mut num = numerator.clone();
    let mut den = denominator.clone();
    num.unify_variables(&mut den);

    if den.is_zero() {
        return Err(PolyError::Undefined(
            format!("division of {} by zero", num).into(),
        ));
    }

    if num.is_zero() {
        return Ok((num.zero(), num.one()));
    }

    let k = den.lcoeff();
    let g = poly_gcd(&num, &den, settings)?.mul_coeff(&k);

    if g.is_constant() {
        let k = g.lcoeff();
        return Ok((num.div_coeff(&k), den.div_coeff(&k)));
    }

    let (qn, rn) = quotients(&num, &[g.clone()]);
    let (qd, rd) = quotients(&den, &[g]);

    if !rn.is_zero() || !rd.is_zero() {
        return Err(PolyError::Undefined(
            format!("the gcd does not divide {} / {}", num, den).into(),
        ));
    }

    let mut qn = qn.into_iter();
    let mut qd = qd.into_iter();
    match (qn.next(), qd.next()) {
        (Some(n), Some(d)) => {
            debug!("Reduced to ({}) / ({})", n, d);
            Ok((n, d))
        }
        _ => Err(PolyError::Undefined("missing quotient".into())),
    }
}

/// Convert `a` to a polynomial, treating an expression without a polynomial
/// representation as a single variable.
fn to_polynomial_or_opaque(a: &Atom) -> Result<MultivariatePolynomial, PolyError> {
    match a.to_polynomial() {
        Ok(p) => Ok(p),
        Err(PolyError::NotAPolynomial(r)) => {
            debug!("Treating {} as a variable: {}", a, r);
            Ok(opaque(a))
        }
        Err(e) => Err(e),
    }
}

/// Reduce the expression `numerator / denominator` to lowest terms, returning the new
/// numerator and a denominator with leading coefficient 1.
///
/// Opaque subexpressions such as `sin(x)` are replaced by placeholders during
/// the gcd computation and restored afterwards.
pub fn reduce_rational_expression(
    numerator: &Atom,
    denominator: &Atom,
    settings: &GroebnerSettings,
) -> Result<(Atom, Atom), PolyError> {
    let r = RationalPolynomial::from_expressions(numerator, denominator, settings)?;
    Ok((r.numerator.to_expression(), r.denominator.to_expression()))
}

/// A fraction of two polynomials in lowest terms with a monic denominator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalPolynomial {
    pub numerator: MultivariatePolynomial,
    pub denominator: MultivariatePolynomial,
}

impl RationalPolynomial {
    pub fn new(
        numerator: &MultivariatePolynomial,
        denominator: &MultivariatePolynomial,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        let mut map = VariableMap::new();
        let num = map.replace(numerator);
        let den = map.replace(denominator);

        let (num, den) = reduce_rational(&num, &den, settings)?;

        Ok(RationalPolynomial {
            numerator: map.restore(&num),
            denominator: map.restore(&den),
        })
    }

    pub fn from_polynomial(p: MultivariatePolynomial) -> RationalPolynomial {
        let denominator = p.one();
        RationalPolynomial {
            numerator: p,
            denominator,
        }
    }

    pub fn from_expressions(
        numerator: &Atom,
        denominator: &Atom,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        let num = to_polynomial_or_opaque(numerator)?;
        let den = to_polynomial_or_opaque(denominator)?;
        Self::new(&num, &den, settings)
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn neg(&self) -> RationalPolynomial {
        RationalPolynomial {
            numerator: -self.numerator.clone(),
            denominator: self.denominator.clone(),
        }
    }

    pub fn inv(&self) -> Result<RationalPolynomial, PolyError> {
        if self.is_zero() {
            return Err(PolyError::Undefined("inverse of zero".into()));
        }

        // the pair is already coprime, only the leading coefficient moves
        let k = self.numerator.lcoeff();
        Ok(RationalPolynomial {
            numerator: self.denominator.clone().div_coeff(&k),
            denominator: self.numerator.clone().div_coeff(&k),
        })
    }

    pub fn add(
        &self,
        other: &RationalPolynomial,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        if self.denominator == other.denominator {
            return Self::new(
                &(&self.numerator + &other.numerator),
                &self.denominator,
                settings,
            );
        }

        let num = &self.numerator * &other.denominator + &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Self::new(&num, &den, settings)
    }

    pub fn sub(
        &self,
        other: &RationalPolynomial,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        self.add(&other.neg(), settings)
    }

    pub fn mul(
        &self,
        other: &RationalPolynomial,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        Self::new(
            &(&self.numerator * &other.numerator),
            &(&self.denominator * &other.denominator),
            settings,
        )
    }

    pub fn div(
        &self,
        other: &RationalPolynomial,
        settings: &GroebnerSettings,
    ) -> Result<RationalPolynomial, PolyError> {
        self.mul(&other.inv()?, settings)
    }

    /// Convert to the expression `numerator / denominator`.
    pub fn to_expression(&self) -> Atom {
        if self.denominator.is_one() {
            return self.numerator.to_expression();
        }

        Atom::div(
            self.numerator.to_expression(),
            self.denominator.to_expression(),
        )
        .normalize()
    }
}

impl Display for RationalPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "({})/({})", self.numerator, self.denominator)
        }
    }
}
