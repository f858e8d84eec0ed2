use std::sync::Arc;

use tracing::{debug, instrument};

use crate::state::State;

use super::groebner::{quotients, reduced_grobner, GroebnerSettings};
use super::polynomial::MultivariatePolynomial;
use super::{PolyError, Variable};

/// Rewrite `p` to the variable list `vars`, which is the variable list of `p`
/// with one extra variable in front.
fn prepend_variable(p: &MultivariatePolynomial, vars: &Arc<Vec<Variable>>) -> MultivariatePolynomial {
    let mut res = MultivariatePolynomial::new(Some(p.nterms()), vars.clone());
    for t in p {
        res.coefficients.push(t.coefficient.clone());
        res.exponents.push(0);
        res.exponents.extend_from_slice(t.exponents);
    }
    res
}

/// Remove the first variable of `p`, which must not occur in `p`.
fn drop_first_variable(p: &MultivariatePolynomial, vars: &Arc<Vec<Variable>>) -> MultivariatePolynomial {
    debug_assert_eq!(p.degree(0), 0);

    let mut res = MultivariatePolynomial::new(Some(p.nterms()), vars.clone());
    for t in p {
        res.coefficients.push(t.coefficient.clone());
        res.exponents.extend_from_slice(&t.exponents[1..]);
    }
    res
}

/// Compute the monic least common multiple of `f` and `g` by elimination.
///
/// With a fresh variable `t`, the ideal `(t*f, (1-t)*g)` intersected with the
/// polynomials free of `t` is the ideal `(lcm(f, g))`. The variable `t` is the most
/// significant variable of the lexicographic order, so that the reduced Groebner basis
/// of `(t*f, (1-t)*g)` contains exactly one element without `t`.
#[instrument(level = "debug", skip_all, fields(%f, %g))]
pub fn poly_lcm(
    f: &MultivariatePolynomial,
    g: &MultivariatePolynomial,
    settings: &GroebnerSettings,
) -> Result<MultivariatePolynomial, PolyError> {
    let mut f = f.clone();
    let mut g = g.clone();
    f.unify_variables(&mut g);

    if f.is_zero() || g.is_zero() {
        return Ok(f.zero());
    }

    if f.is_constant() {
        return Ok(g.make_monic());
    }
    if g.is_constant() {
        return Ok(f.make_monic());
    }

    let t = Variable::Temporary(State::new_temporary());
    let mut vars = Vec::with_capacity(f.nvars() + 1);
    vars.push(t);
    vars.extend(f.get_vars_ref().iter().cloned());
    let vars = Arc::new(vars);

    let fe = prepend_variable(&f, &vars);
    let ge = prepend_variable(&g, &vars);

    let mut t_exp = vec![0; vars.len()];
    t_exp[0] = 1;

    let tf = fe.mul_exp(&t_exp);
    let tg = ge.clone().mul_exp(&t_exp);
    let one_minus_t_g = ge - tg;

    let basis = reduced_grobner(&[tf, one_minus_t_g], settings)?;
    debug!("Elimination basis has {} elements", basis.len());

    let lcm = basis
        .iter()
        .find(|p| p.get_vars_ref().first() == vars.first() && p.degree(0) == 0)
        .ok_or_else(|| {
            PolyError::Undefined("the elimination ideal has no generator without t".into())
        })?;

    Ok(drop_first_variable(lcm, &f.variables))
}

/// Compute the monic greatest common divisor of `f` and `g` as `f*g / lcm(f, g)`.
#[instrument(level = "debug", skip_all, fields(%f, %g))]
pub fn poly_gcd(
    f: &MultivariatePolynomial,
    g: &MultivariatePolynomial,
    settings: &GroebnerSettings,
) -> Result<MultivariatePolynomial, PolyError> {
    let mut f = f.clone();
    let mut g = g.clone();
    f.unify_variables(&mut g);

    if f.is_zero() {
        return Ok(g.make_monic());
    }
    if g.is_zero() {
        return Ok(f.make_monic());
    }
    if f.is_constant() || g.is_constant() {
        return Ok(f.one());
    }

    let lcm = poly_lcm(&f, &g, settings)?;
    let (q, r) = quotients(&(&f * &g), &[lcm]);

    if !r.is_zero() {
        return Err(PolyError::Undefined(
            format!("the product of {} and {} is not divisible by their lcm", f, g).into(),
        ));
    }

    let gcd = q.into_iter().next().unwrap_or_else(|| f.zero()).make_monic();
    debug!("gcd = {}", gcd);
    Ok(gcd)
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, poly::polynomial::MultivariatePolynomial};

    use super::super::groebner::{poly_div, GroebnerSettings};
    use super::{poly_gcd, poly_lcm};

    fn p(s: &str) -> MultivariatePolynomial {
        Atom::parse(s).unwrap().to_polynomial().unwrap()
    }

    #[test]
    fn univariate() {
        let settings = GroebnerSettings::default();
        let f = p("x^2 - 1");
        let g = p("x^2 + 2x + 1");

        assert_eq!(poly_lcm(&f, &g, &settings).unwrap(), p("(x-1)*(x+1)^2"));
        assert_eq!(poly_gcd(&f, &g, &settings).unwrap(), p("x + 1"));
        assert_eq!(poly_gcd(&p("x^2 + 1"), &p("x - 3"), &settings).unwrap(), p("1"));
    }

    #[test]
    fn multivariate() {
        let settings = GroebnerSettings::default();
        let f = p("3*(x + 2y)*(x - y)*z");
        let g = p("(x + 2y)*(z^2 + 1)");

        let gcd = poly_gcd(&f, &g, &settings).unwrap();
        assert_eq!(gcd, p("x + 2y"));

        let lcm = poly_lcm(&f, &g, &settings).unwrap();
        assert_eq!(lcm, p("(x + 2y)*(x - y)*z*(z^2 + 1)"));

        // gcd * lcm is associate to f * g
        let fg = &f * &g;
        assert_eq!((&gcd * &lcm).mul_coeff(&fg.lcoeff()), fg);

        // the lcm is divisible by both
        assert!(poly_div(&lcm, &[f.clone()]).1.is_zero());
        assert!(poly_div(&lcm, &[g]).1.is_zero());

        // no temporary variable is left behind
        assert_eq!(lcm.get_vars_ref(), f.get_vars_ref());
    }

    #[test]
    fn degenerate() {
        let settings = GroebnerSettings::default();
        let f = p("2x*y - 4y");
        let zero = p("0");

        assert_eq!(poly_gcd(&f, &f, &settings).unwrap(), p("x*y - 2y"));
        assert_eq!(poly_gcd(&zero, &f, &settings).unwrap(), p("x*y - 2y"));
        assert_eq!(poly_gcd(&f, &zero, &settings).unwrap(), p("x*y - 2y"));
        assert!(poly_lcm(&zero, &f, &settings).unwrap().is_zero());
        assert_eq!(poly_gcd(&p("6"), &f, &settings).unwrap(), p("1"));
        assert_eq!(poly_lcm(&p("6"), &f, &settings).unwrap(), p("x*y - 2y"));
    }
}
