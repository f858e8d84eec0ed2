//! Multivariate division and Buchberger's algorithm for reduced Groebner bases
//! in the lexicographic order.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, instrument};

use super::monomial::Monomial;
use super::polynomial::MultivariatePolynomial;
use super::PolyError;

static DEFAULT_MAX_STEPS: Lazy<usize> = Lazy::new(|| {
    std::env::var("EXPRPOLY_GROEBNER_MAX_STEPS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(100_000)
});

/// Settings for Groebner basis computations.
#[derive(Clone, Debug)]
pub struct GroebnerSettings {
    /// The maximal number of S-polynomial reductions. `None` means no limit.
    pub max_steps: Option<usize>,
    /// A flag that cancels the computation when it is set.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for GroebnerSettings {
    /// The default step budget is read from `EXPRPOLY_GROEBNER_MAX_STEPS`,
    /// with a fallback of 100000.
    fn default() -> Self {
        GroebnerSettings {
            max_steps: Some(*DEFAULT_MAX_STEPS),
            abort: None,
        }
    }
}

impl GroebnerSettings {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_steps = None;
        self
    }

    pub fn with_abort_flag(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = Some(abort);
        self
    }

    #[inline]
    fn check(&self, steps: usize) -> Result<(), PolyError> {
        if let Some(a) = &self.abort {
            if a.load(Relaxed) {
                return Err(PolyError::Aborted);
            }
        }

        match self.max_steps {
            Some(m) if steps >= m => Err(PolyError::BudgetExceeded { steps }),
            _ => Ok(()),
        }
    }
}

/// Statistics of a Groebner basis computation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroebnerStats {
    pub pairs_computed: usize,
    /// Pairs with coprime leading monomials, whose S-polynomial reduces to zero.
    pub pairs_skipped: usize,
    pub zero_reductions: usize,
    pub polynomials_added: usize,
    pub steps: usize,
}

/// Divide `f` by `divisors`, which must share the variable list of `f`.
fn divide(
    f: &MultivariatePolynomial,
    divisors: &[&MultivariatePolynomial],
) -> (Vec<(usize, Monomial)>, MultivariatePolynomial) {
    let leads: Vec<Option<Monomial>> = divisors
        .iter()
        .map(|g| {
            if g.is_zero() {
                None
            } else {
                Some(g.lead_monomial())
            }
        })
        .collect();

    let nvars = f.nvars();
    let mut quotients = vec![];
    let mut p = f.clone();
    let mut rest_coeff = vec![];
    let mut rest_exponents = vec![];

    while !p.is_zero() {
        let lt = p.lead_monomial();

        let divisor = leads.iter().enumerate().find_map(|(i, l)| match l {
            Some(l) if lt.is_divisible_by(l) => Some((i, l)),
            _ => None,
        });

        if let Some((i, l)) = divisor {
            let q = lt / l;
            p = p - divisors[i].clone().mul_monomial(&q.coefficient, &q.exponents);
            quotients.push((i, q));
        } else {
            // strip leading monomial that is not reducible
            let n = p.nterms() - 1;
            rest_exponents.extend_from_slice(p.exponents(n));
            rest_coeff.extend(p.coefficients.pop());
            p.exponents.truncate(n * nvars);
        }
    }

    // append in sorted order
    let mut r = f.zero_with_capacity(rest_coeff.len());
    while let Some(c) = rest_coeff.pop() {
        let l = rest_coeff.len();
        r.coefficients.push(c);
        r.exponents
            .extend_from_slice(&rest_exponents[l * nvars..(l + 1) * nvars]);
    }

    (quotients, r)
}

/// Unify the variable lists of `f` and `divisors` if they are different.
fn unify_all(
    f: &MultivariatePolynomial,
    divisors: &[MultivariatePolynomial],
) -> Option<Vec<MultivariatePolynomial>> {
    if divisors.iter().all(|d| d.variables == f.variables) {
        return None;
    }

    let mut polys = Vec::with_capacity(divisors.len() + 1);
    polys.push(f.clone());
    polys.extend(divisors.iter().cloned());
    MultivariatePolynomial::unify_variables_list(&mut polys);
    Some(polys)
}

/// Divide `f` by the polynomials in `divisors`.
///
/// The largest term of the remainder that is divisible by the leading monomial of
/// a divisor is eliminated, using the first such divisor, until no term is
/// divisible anymore. Zero divisors are ignored. Returns the divisor index and
/// quotient monomial of every elimination, and the remainder.
pub fn poly_div(
    f: &MultivariatePolynomial,
    divisors: &[MultivariatePolynomial],
) -> (Vec<(usize, Monomial)>, MultivariatePolynomial) {
    match unify_all(f, divisors) {
        Some(polys) => {
            let refs: Vec<_> = polys[1..].iter().collect();
            divide(&polys[0], &refs)
        }
        None => {
            let refs: Vec<_> = divisors.iter().collect();
            divide(f, &refs)
        }
    }
}

/// Divide `f` by `divisors` and collect the quotient of every divisor,
/// such that `f = sum(quotients[i] * divisors[i]) + remainder`.
pub fn quotients(
    f: &MultivariatePolynomial,
    divisors: &[MultivariatePolynomial],
) -> (Vec<MultivariatePolynomial>, MultivariatePolynomial) {
    let (qs, r) = poly_div(f, divisors);

    let mut res = vec![r.zero(); divisors.len()];
    for (i, m) in qs {
        res[i].append_monomial(m.coefficient, &m.exponents);
    }

    (res, r)
}

/// Auto-reduce a list of polynomials: every polynomial is divided by all the others
/// until nothing changes, zero polynomials are dropped and the result is made monic.
///
/// A list that contains a non-zero constant collapses to `[1]` and a list of
/// zeros collapses to `[0]`. The result is sorted by descending leading monomial.
pub fn reduce(polys: &[MultivariatePolynomial]) -> Vec<MultivariatePolynomial> {
    if polys.is_empty() {
        return vec![];
    }

    let mut all = polys.to_vec();
    MultivariatePolynomial::unify_variables_list(&mut all);

    let zero = all[0].zero();
    let mut system: Vec<_> = all.into_iter().filter(|p| !p.is_zero()).collect();

    if system.is_empty() {
        return vec![zero];
    }

    if system.iter().any(|p| p.is_constant()) {
        return vec![zero.one()];
    }

    loop {
        let mut changed = false;
        let mut i = 0;
        while i < system.len() {
            let others: Vec<_> = system
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| p)
                .collect();

            let (q, r) = divide(&system[i], &others);

            if q.is_empty() {
                i += 1;
                continue;
            }

            changed = true;
            if r.is_zero() {
                system.remove(i);
                continue;
            }

            if r.is_constant() {
                return vec![zero.one()];
            }

            system[i] = r;
            i += 1;
        }

        if !changed {
            break;
        }
    }

    let mut basis: Vec<_> = system.into_iter().map(|p| p.make_monic()).collect();
    basis.sort_by(|p1, p2| p2.last_exponents().cmp(p1.last_exponents()));
    basis
}

/// The S-polynomial `LT(g)/m * f - LT(f)/m * g` with `m = gcd(LM(f), LM(g))`,
/// in which the leading terms cancel.
pub fn s_polynomial(
    f: &MultivariatePolynomial,
    g: &MultivariatePolynomial,
) -> MultivariatePolynomial {
    if f.variables != g.variables {
        let mut f = f.clone();
        let mut g = g.clone();
        f.unify_variables(&mut g);
        return s_polynomial(&f, &g);
    }

    let lf = f.lead_monomial();
    let lg = g.lead_monomial();
    let m = lf.gcd(&lg);

    let extra_factor_f = lg / &m;
    let extra_factor_g = lf / &m;

    f.clone()
        .mul_monomial(&extra_factor_f.coefficient, &extra_factor_f.exponents)
        - g.clone()
            .mul_monomial(&extra_factor_g.coefficient, &extra_factor_g.exponents)
}

/// A pair of basis elements with the remainder of their S-polynomial.
#[derive(Debug, Clone)]
pub struct CriticalPair {
    pub first: usize,
    pub second: usize,
    /// The lcm of the leading monomials.
    pub lcm: Monomial,
    /// The non-zero remainder of the S-polynomial.
    pub remainder: MultivariatePolynomial,
    /// The size of the basis the remainder was reduced against.
    reduced_against: usize,
}

/// A strategy to select the next critical pair. The smallest pair is selected first.
pub trait SelectionStrategy {
    fn cmp(a: &CriticalPair, b: &CriticalPair) -> Ordering;
}

/// Select the pair whose reduced S-polynomial has the lowest leading monomial.
pub struct LowestLeadingMonomial;

impl SelectionStrategy for LowestLeadingMonomial {
    fn cmp(a: &CriticalPair, b: &CriticalPair) -> Ordering {
        a.remainder
            .last_exponents()
            .cmp(b.remainder.last_exponents())
            .then_with(|| a.lcm.cmp(&b.lcm))
    }
}

/// The normal selection strategy: select the pair with the lowest lcm of leading monomials.
pub struct NormalStrategy;

impl SelectionStrategy for NormalStrategy {
    fn cmp(a: &CriticalPair, b: &CriticalPair) -> Ordering {
        a.lcm.cmp(&b.lcm).then_with(|| {
            a.remainder
                .last_exponents()
                .cmp(b.remainder.last_exponents())
        })
    }
}

pub struct GroebnerBasis<S: SelectionStrategy = LowestLeadingMonomial> {
    pub system: Vec<MultivariatePolynomial>,
    pub stats: GroebnerStats,
    _phantom: PhantomData<S>,
}

impl<S: SelectionStrategy> GroebnerBasis<S> {
    /// Construct the reduced Groebner basis of a polynomial ideal with Buchberger's algorithm.
    ///
    /// The ideal of only zero polynomials yields `[0]` and the unit ideal yields `[1]`.
    #[instrument(level = "debug", skip_all, fields(generators = ideal.len()))]
    pub fn new(
        ideal: &[MultivariatePolynomial],
        settings: &GroebnerSettings,
    ) -> Result<GroebnerBasis<S>, PolyError> {
        let mut stats = GroebnerStats::default();
        let mut basis = reduce(ideal);

        if basis.len() < 2 {
            return Ok(GroebnerBasis {
                system: basis,
                stats,
                _phantom: PhantomData,
            });
        }

        let mut pairs = vec![];
        for j in 1..basis.len() {
            for i in 0..j {
                Self::add_pair(&basis, i, j, &mut pairs, &mut stats, settings)?;
            }
        }

        while let Some(best) = pairs
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| S::cmp(a, b))
            .map(|(i, _)| i)
        {
            let mut pair = pairs.swap_remove(best);

            if pair.reduced_against < basis.len() {
                // the basis has grown since the remainder was computed
                settings.check(stats.steps)?;
                stats.steps += 1;

                let refs: Vec<_> = basis.iter().collect();
                let (_, r) = divide(&pair.remainder, &refs);
                if r.is_zero() {
                    stats.zero_reductions += 1;
                } else {
                    pair.remainder = r;
                    pair.reduced_against = basis.len();
                    pairs.push(pair);
                }
                continue;
            }

            let h = pair.remainder.make_monic();

            debug!(
                basis = basis.len(),
                pending = pairs.len(),
                steps = stats.steps,
                "adding S-polynomial of ({}, {}) with leading monomial {:?}",
                pair.first,
                pair.second,
                h.last_exponents()
            );

            if h.is_constant() {
                pairs.clear();
                basis = vec![h];
                break;
            }

            basis.push(h);
            stats.polynomials_added += 1;

            let j = basis.len() - 1;
            for i in 0..j {
                Self::add_pair(&basis, i, j, &mut pairs, &mut stats, settings)?;
            }
        }

        let system = reduce(&basis);

        debug!(
            size = system.len(),
            pairs_computed = stats.pairs_computed,
            pairs_skipped = stats.pairs_skipped,
            zero_reductions = stats.zero_reductions,
            "Groebner basis complete"
        );

        Ok(GroebnerBasis {
            system,
            stats,
            _phantom: PhantomData,
        })
    }

    /// Compute the reduced S-polynomial of `basis[i]` and `basis[j]` and store it
    /// when it is non-zero. Pairs with coprime leading monomials are skipped.
    fn add_pair(
        basis: &[MultivariatePolynomial],
        i: usize,
        j: usize,
        pairs: &mut Vec<CriticalPair>,
        stats: &mut GroebnerStats,
        settings: &GroebnerSettings,
    ) -> Result<(), PolyError> {
        let li = basis[i].lead_monomial();
        let lj = basis[j].lead_monomial();

        if li.is_coprime(&lj) {
            stats.pairs_skipped += 1;
            return Ok(());
        }

        settings.check(stats.steps)?;
        stats.steps += 1;
        stats.pairs_computed += 1;

        let s = s_polynomial(&basis[i], &basis[j]);
        let refs: Vec<_> = basis.iter().collect();
        let (_, r) = divide(&s, &refs);

        if r.is_zero() {
            stats.zero_reductions += 1;
            return Ok(());
        }

        pairs.push(CriticalPair {
            first: i,
            second: j,
            lcm: li.lcm(&lj),
            remainder: r,
            reduced_against: basis.len(),
        });

        Ok(())
    }

    /// Check if `system` is a Groebner basis, i.e., if every S-polynomial
    /// reduces to zero.
    pub fn is_groebner_basis(system: &[MultivariatePolynomial]) -> bool {
        let mut system: Vec<_> = system.iter().filter(|p| !p.is_zero()).cloned().collect();
        MultivariatePolynomial::unify_variables_list(&mut system);

        let refs: Vec<_> = system.iter().collect();
        for (i, p1) in system.iter().enumerate() {
            for p2 in &system[i + 1..] {
                let s = s_polynomial(p1, p2);
                if !divide(&s, &refs).1.is_zero() {
                    return false;
                }
            }
        }
        true
    }
}

/// Compute the reduced Groebner basis of `polys` in the lexicographic order,
/// selecting pairs by the lowest leading monomial.
pub fn reduced_grobner(
    polys: &[MultivariatePolynomial],
    settings: &GroebnerSettings,
) -> Result<Vec<MultivariatePolynomial>, PolyError> {
    GroebnerBasis::<LowestLeadingMonomial>::new(polys, settings).map(|b| b.system)
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use crate::{
        atom::Atom,
        poly::{polynomial::MultivariatePolynomial, PolyError},
    };

    use super::{
        poly_div, quotients, reduce, reduced_grobner, s_polynomial, GroebnerBasis,
        GroebnerSettings, LowestLeadingMonomial, NormalStrategy,
    };

    fn p(s: &str) -> MultivariatePolynomial {
        Atom::parse(s).unwrap().to_polynomial().unwrap()
    }

    fn ps(s: &[&str]) -> Vec<MultivariatePolynomial> {
        s.iter().map(|x| p(x)).collect()
    }

    #[test]
    fn division() {
        let f = p("x^2*y + x*y^2 + y^2");
        let divisors = ps(&["x*y - 1", "y^2 - 1"]);
        let (qs, r) = quotients(&f, &divisors);

        assert_eq!(r, p("x + y + 1"));

        let mut sum = r.clone();
        for (q, d) in qs.iter().zip(&divisors) {
            sum = sum + q * d;
        }
        assert_eq!(sum, f);

        // no term of the remainder is divisible by a leading monomial
        let (steps, r2) = poly_div(&r, &divisors);
        assert!(steps.is_empty());
        assert_eq!(r2, r);
    }

    #[test]
    fn division_by_zero_divisor_is_ignored() {
        let f = p("x^2 + 1");
        let (qs, r) = poly_div(&f, &[f.zero(), p("x")]);
        assert_eq!(r, p("1"));
        assert!(qs.iter().all(|(i, _)| *i == 1));
    }

    #[test]
    fn s_polynomial_cancels() {
        let f = p("x^2*y - 1");
        let g = p("2x*y^2 - x");
        let s = s_polynomial(&f, &g);
        // 2y*f - x*g
        assert_eq!(s, p("x^2 - 2y"));
    }

    #[test]
    fn auto_reduce() {
        let r = reduce(&ps(&["x^2 + x*y", "x*y", "0"]));
        assert_eq!(r, ps(&["x^2", "x*y"]));

        assert_eq!(reduce(&ps(&["x + 1", "3"])), ps(&["1"]));
        assert_eq!(reduce(&ps(&["0", "0"])), ps(&["0"]));
        assert!(reduce(&[]).is_empty());

        let monic = reduce(&ps(&["2x + 4"]));
        assert_eq!(monic, ps(&["x + 2"]));
    }

    #[test]
    fn groebner_basis() {
        let ideal = ps(&["x^2 + y", "x*y - 1"]);
        let settings = GroebnerSettings::default();

        let b = GroebnerBasis::<LowestLeadingMonomial>::new(&ideal, &settings).unwrap();
        assert_eq!(b.system, ps(&["x + y^2", "y^3 + 1"]));
        assert!(GroebnerBasis::<LowestLeadingMonomial>::is_groebner_basis(&b.system));
        assert!(!GroebnerBasis::<LowestLeadingMonomial>::is_groebner_basis(&ideal));

        let b2 = GroebnerBasis::<NormalStrategy>::new(&ideal, &settings).unwrap();
        assert_eq!(b2.system, b.system);
        assert!(b.stats.pairs_computed > 0);
    }

    #[test]
    fn groebner_edge_cases() {
        let settings = GroebnerSettings::default();
        assert_eq!(reduced_grobner(&ps(&["0"]), &settings).unwrap(), ps(&["0"]));
        assert_eq!(
            reduced_grobner(&ps(&["x*y - 1", "x", "y + 2"]), &settings).unwrap(),
            ps(&["1"])
        );
        assert_eq!(
            reduced_grobner(&ps(&["x^2 - 1", "x - 1"]), &settings).unwrap(),
            ps(&["x - 1"])
        );
    }

    #[test]
    fn coprime_pairs_are_skipped() {
        let settings = GroebnerSettings::default();
        let b = GroebnerBasis::<LowestLeadingMonomial>::new(&ps(&["x^2 + 1", "y^3 + y"]), &settings)
            .unwrap();
        assert_eq!(b.stats.pairs_skipped, 1);
        assert_eq!(b.stats.pairs_computed, 0);
        assert_eq!(b.system.len(), 2);
    }

    #[test]
    fn budget_and_abort() {
        let ideal = ps(&["x^3 - 2x*y", "x^2*y - 2y^2 + x"]);

        let settings = GroebnerSettings::default().with_max_steps(0);
        assert!(matches!(
            reduced_grobner(&ideal, &settings),
            Err(PolyError::BudgetExceeded { steps: 0 })
        ));

        let flag = Arc::new(AtomicBool::new(true));
        let settings = GroebnerSettings::default().with_abort_flag(flag);
        assert_eq!(reduced_grobner(&ideal, &settings), Err(PolyError::Aborted));

        let settings = GroebnerSettings::default().unbounded();
        let b = reduced_grobner(&ideal, &settings).unwrap();
        assert!(GroebnerBasis::<LowestLeadingMonomial>::is_groebner_basis(&b));
        for f in &ideal {
            assert!(poly_div(f, &b).1.is_zero());
        }
    }
}
