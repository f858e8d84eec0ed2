use ahash::{HashMap, HashMapExt};
use std::cmp::Ordering;
use std::fmt::Display;
use std::mem;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::coefficient::Coefficient;

use super::monomial::Monomial;
use super::{PolyError, Variable, INLINED_EXPONENTS};

/// A multivariate polynomial with rational coefficients, in sparse form.
#[derive(Clone, Debug)]
pub struct MultivariatePolynomial {
    // Data format: the i-th monomial is stored as coefficients[i] and
    // exponents[i * nvars .. (i + 1) * nvars]. Terms are always expanded and sorted
    // in ascending lexicographic order of the exponents, so the last term is the
    // leading term. The first variable is the most significant.
    pub coefficients: Vec<Coefficient>,
    pub exponents: Vec<u32>,
    pub variables: Arc<Vec<Variable>>,
}

impl MultivariatePolynomial {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable list is inherited.
    #[inline]
    pub fn new(cap: Option<usize>, variables: Arc<Vec<Variable>>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            exponents: Vec::with_capacity(cap.unwrap_or(0) * variables.len()),
            variables,
        }
    }

    /// Constructs a constant polynomial without variables.
    pub fn new_constant(coeff: Coefficient) -> Self {
        Self::new(Some(1), Arc::new(vec![])).constant(coeff)
    }

    /// Constructs the polynomial `v`.
    pub fn new_variable(v: Variable) -> Self {
        Self {
            coefficients: vec![Coefficient::one()],
            exponents: vec![1],
            variables: Arc::new(vec![v]),
        }
    }

    /// Constructs a zero polynomial, inheriting the variable list from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self {
            coefficients: vec![],
            exponents: vec![],
            variables: self.variables.clone(),
        }
    }

    /// Constructs a zero polynomial with the given capacity,
    /// inheriting the variable list from `self`.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars()),
            variables: self.variables.clone(),
        }
    }

    /// Constructs a constant polynomial, inheriting the variable list from `self`.
    #[inline]
    pub fn constant(&self, coeff: Coefficient) -> Self {
        if coeff.is_zero() {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents: vec![0; self.nvars()],
            variables: self.variables.clone(),
        }
    }

    /// Constructs a polynomial that is one, inheriting the variable list from `self`.
    #[inline]
    pub fn one(&self) -> Self {
        self.constant(Coefficient::one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: Coefficient, exponents: Vec<u32>) -> Self {
        debug_assert!(self.nvars() == exponents.len());

        if coeff.is_zero() {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents,
            variables: self.variables.clone(),
        }
    }

    /// Constructs the polynomial that is the `index`th variable.
    pub fn variable(&self, index: usize) -> Self {
        let mut e = vec![0; self.nvars()];
        e[index] = 1;
        self.monomial(Coefficient::one(), e)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1 && self.coefficients[0].is_one() && self.exponents.iter().all(|x| *x == 0)
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.nterms() {
            0 => true,
            1 => self.exponents.iter().all(|e| *e == 0),
            _ => false,
        }
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> Coefficient {
        if self.is_zero() || !self.exponents(0).iter().all(|e| *e == 0) {
            return Coefficient::zero();
        }

        self.coefficients[0].clone()
    }

    /// Returns the slice for the exponents of the specified monomial.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[u32] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    /// Returns the exponents of the leading monomial.
    ///
    /// Panics when the polynomial is zero.
    #[inline]
    pub fn last_exponents(&self) -> &[u32] {
        assert!(self.nterms() > 0, "Zero polynomial has no leading monomial");
        &self.exponents[(self.nterms() - 1) * self.nvars()..self.nterms() * self.nvars()]
    }

    /// Returns an iterator over the exponents of every monomial.
    #[inline]
    pub fn exponents_iter(&self) -> std::slice::Chunks<u32> {
        self.exponents.chunks(self.nvars().max(1))
    }

    /// Get a copy of the variable list.
    pub fn get_vars(&self) -> Arc<Vec<Variable>> {
        self.variables.clone()
    }

    /// Get a reference to the variables list.
    pub fn get_vars_ref(&self) -> &[Variable] {
        self.variables.as_ref()
    }

    /// Get the `index`th monomial.
    pub fn to_monomial(&self, index: usize) -> Monomial {
        Monomial::new(
            self.coefficients[index].clone(),
            self.exponents(index).iter().cloned().collect(),
        )
    }

    /// Get the leading monomial. The leading monomial of the zero
    /// polynomial has a zero coefficient.
    pub fn lead_monomial(&self) -> Monomial {
        if self.is_zero() {
            let mut m = Monomial::one(self.nvars());
            m.coefficient = Coefficient::zero();
            m
        } else {
            self.to_monomial(self.nterms() - 1)
        }
    }

    /// Unify the variable lists of two polynomials, i.e.
    /// rewrite a polynomial in `x` and one in `y` to a
    /// two polynomial in `x` and `y`.
    ///
    /// Sorted variable lists are merged, so that the result is sorted as well.
    /// Otherwise the variables of `other` that are missing in `self`
    /// are appended.
    #[inline(always)]
    pub fn unify_variables(&mut self, other: &mut Self) {
        if self.variables == other.variables {
            return;
        }

        self.unify_variables_impl(other)
    }

    fn unify_variables_impl(&mut self, other: &mut Self) {
        let is_sorted = |v: &[Variable]| v.windows(2).all(|w| w[0] < w[1]);

        let mut new_var_map = Vec::with_capacity(self.nvars() + other.nvars());
        let mut new_var_pos_self = vec![0; self.nvars()];
        let mut new_var_pos_other = vec![0; other.nvars()];

        if is_sorted(&self.variables) && is_sorted(&other.variables) {
            let (mut i, mut j) = (0, 0);
            while i < self.nvars() || j < other.nvars() {
                let c = match (self.variables.get(i), other.variables.get(j)) {
                    (Some(a), Some(b)) => a.cmp(b),
                    (Some(_), None) => Ordering::Less,
                    _ => Ordering::Greater,
                };

                match c {
                    Ordering::Less => {
                        new_var_pos_self[i] = new_var_map.len();
                        new_var_map.push(self.variables[i].clone());
                        i += 1;
                    }
                    Ordering::Greater => {
                        new_var_pos_other[j] = new_var_map.len();
                        new_var_map.push(other.variables[j].clone());
                        j += 1;
                    }
                    Ordering::Equal => {
                        new_var_pos_self[i] = new_var_map.len();
                        new_var_pos_other[j] = new_var_map.len();
                        new_var_map.push(self.variables[i].clone());
                        i += 1;
                        j += 1;
                    }
                }
            }
        } else {
            new_var_map.extend(self.variables.iter().cloned());
            for (i, p) in new_var_pos_self.iter_mut().enumerate() {
                *p = i;
            }

            for (pos, v) in new_var_pos_other.iter_mut().zip(other.variables.as_ref()) {
                if let Some(p) = new_var_map.iter().position(|x| x == v) {
                    *pos = p;
                } else {
                    *pos = new_var_map.len();
                    new_var_map.push(v.clone());
                }
            }
        }

        let new_var_map = Arc::new(new_var_map);
        *self = self.map_variables(&new_var_pos_self, new_var_map.clone());
        *other = other.map_variables(&new_var_pos_other, new_var_map);
    }

    /// Unify the variable lists of all polynomials in the slice.
    pub fn unify_variables_list(polys: &mut [Self]) {
        if polys.len() < 2 {
            return;
        }

        if let Some((first, rest)) = polys.split_first_mut() {
            for _ in 0..2 {
                for p in &mut *rest {
                    first.unify_variables(p);
                }
            }
        }
    }

    /// Move the exponent of the `i`th variable to position `positions[i]` of
    /// the new variable list `variables`.
    fn map_variables(&self, positions: &[usize], variables: Arc<Vec<Variable>>) -> Self {
        let mut res = Self::new(Some(self.nterms()), variables);

        // an order-preserving map keeps the terms sorted
        let keeps_order = positions.windows(2).all(|w| w[0] < w[1]);

        let mut newexp = vec![0; res.nvars()];
        for t in self {
            for e in &mut newexp {
                *e = 0;
            }

            for (p, e) in positions.iter().zip(t.exponents) {
                newexp[*p] = *e;
            }

            if keeps_order {
                res.coefficients.push(t.coefficient.clone());
                res.exponents.extend_from_slice(&newexp);
            } else {
                res.append_monomial(t.coefficient.clone(), &newexp);
            }
        }

        res
    }

    /// Replace the variables by `variables`, which must be distinct. The new
    /// variable list is sorted and the terms are reordered accordingly.
    pub fn rename_variables(&self, variables: &[Variable]) -> Self {
        assert_eq!(
            variables.len(),
            self.nvars(),
            "The number of new variables does not match"
        );

        let mut order: Vec<usize> = (0..self.nvars()).collect();
        order.sort_by(|a, b| variables[*a].cmp(&variables[*b]));

        let mut positions = vec![0; self.nvars()];
        for (new_pos, old_pos) in order.iter().enumerate() {
            positions[*old_pos] = new_pos;
        }

        let new_vars = order.iter().map(|i| variables[*i].clone()).collect();
        self.map_variables(&positions, Arc::new(new_vars))
    }

    /// Remove all variables that do not occur in the polynomial.
    pub fn prune_variables(&self) -> Self {
        let keep: Vec<usize> = (0..self.nvars()).filter(|v| self.degree(*v) > 0).collect();

        if keep.len() == self.nvars() {
            return self.clone();
        }

        let mut res = Self::new(
            Some(self.nterms()),
            Arc::new(keep.iter().map(|v| self.variables[*v].clone()).collect()),
        );

        for t in self {
            res.coefficients.push(t.coefficient.clone());
            res.exponents.extend(keep.iter().map(|v| t.exponents[*v]));
        }

        res
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients.
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if c.is_zero() {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match self.exponents(t).cmp(self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Less => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {}",
                    self
                ),
                Ordering::Greater => {}
            }
        }
    }

    /// Appends a monomial to the polynomial, merging it with an
    /// existing monomial with the same exponents.
    pub fn append_monomial(&mut self, coefficient: Coefficient, exponents: &[u32]) {
        if coefficient.is_zero() {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!(
                "nvars mismatched: got {}, expected {}",
                exponents.len(),
                self.nvars()
            );
        }

        // should we append to the back?
        if self.nterms() == 0 || self.last_exponents() < exponents {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        // binary search for the insertion point
        let nvars = self.nvars();
        let (mut l, mut r) = (0, self.nterms());
        while l < r {
            let m = (l + r) / 2;
            match exponents.cmp(self.exponents(m)) {
                Ordering::Equal => {
                    self.coefficients[m] = self.coefficients[m].add(&coefficient);
                    if self.coefficients[m].is_zero() {
                        self.coefficients.remove(m);
                        self.exponents.drain(m * nvars..(m + 1) * nvars);
                    }
                    return;
                }
                Ordering::Greater => l = m + 1,
                Ordering::Less => r = m,
            }
        }

        self.coefficients.insert(l, coefficient);
        let i = l * nvars;
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: &Coefficient) -> Self {
        if other.is_zero() {
            return self.zero();
        }

        for c in &mut self.coefficients {
            *c = c.mul(other);
        }

        self
    }

    /// Divide every coefficient by `other`.
    ///
    /// Panics when `other` is zero.
    pub fn div_coeff(self, other: &Coefficient) -> Self {
        let inv = other.inv();
        self.mul_coeff(&inv)
    }

    /// Add `exponents` to every exponent.
    pub fn mul_exp(mut self, exponents: &[u32]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        if self.nvars() == 0 {
            return self;
        }

        let nvars = self.nvars();
        for e in self.exponents.chunks_mut(nvars) {
            for (e1, e2) in e.iter_mut().zip(exponents) {
                *e1 = e1.checked_add(*e2).expect("overflow in adding exponents");
            }
        }

        self
    }

    /// Multiply by the monomial `coefficient * x^exponents`.
    #[inline]
    pub fn mul_monomial(self, coefficient: &Coefficient, exponents: &[u32]) -> Self {
        self.mul_coeff(coefficient).mul_exp(exponents)
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> Coefficient {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(Coefficient::zero)
    }

    /// Make the polynomial monic, i.e., make the leading coefficient `1` by
    /// multiplying all monomials with `1/lcoeff`.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.lcoeff().is_one() {
            self
        } else {
            let ci = self.lcoeff().inv();
            self.mul_coeff(&ci)
        }
    }

    /// Get the degree of the variable `x`.
    /// This operation is O(n).
    pub fn degree(&self, x: usize) -> u32 {
        if self.nvars() == 0 {
            return 0;
        }

        self.exponents
            .iter()
            .skip(x)
            .step_by(self.nvars())
            .max()
            .cloned()
            .unwrap_or(0)
    }

    /// Get the largest exponent of any variable in any term.
    pub fn max_degree(&self) -> u32 {
        self.exponents.iter().max().cloned().unwrap_or(0)
    }

    /// Get the position of `v` in the variable list.
    pub fn get_var_index(&self, v: &Variable) -> Option<usize> {
        self.variables.iter().position(|x| x == v)
    }

    /// Compute `self^pow` with binary exponentiation.
    pub fn pow(&self, mut pow: u64) -> Self {
        if pow == 0 {
            return self.one();
        }

        if self.is_constant() {
            return self.constant(self.lcoeff().pow(pow));
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Compute `self^e`, where `e` must be a non-negative integer constant.
    pub fn checked_pow(&self, e: &Self) -> Result<Self, PolyError> {
        if !e.is_constant() {
            return Err(PolyError::Undefined(
                format!("cannot raise to the polynomial power {}", e).into(),
            ));
        }

        match e.get_constant().to_fraction() {
            Some((n, 1)) if n >= 0 => Ok(self.pow(n as u64)),
            _ => Err(PolyError::Undefined(
                format!("{} is not a non-negative integer power", e).into(),
            )),
        }
    }

    /// Multiply two polynomials with the same variable list, accumulating
    /// the products at the exponent sums that actually occur.
    fn mul_sparse(&self, rhs: &Self) -> Self {
        let mut terms: HashMap<SmallVec<[u32; INLINED_EXPONENTS]>, Coefficient> =
            HashMap::with_capacity(self.nterms() * rhs.nterms());

        for t1 in self {
            for t2 in rhs {
                let e = t1
                    .exponents
                    .iter()
                    .zip(t2.exponents)
                    .map(|(a, b)| a.checked_add(*b).expect("overflow in adding exponents"))
                    .collect();

                let c = t1.coefficient.mul(t2.coefficient);
                let entry = terms.entry(e).or_insert_with(Coefficient::zero);
                *entry = entry.add(&c);
            }
        }

        let mut sorted: Vec<_> = terms.into_iter().filter(|(_, c)| !c.is_zero()).collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut res = self.zero_with_capacity(sorted.len());
        for (e, c) in sorted {
            res.coefficients.push(c);
            res.exponents.extend_from_slice(&e);
        }
        res
    }
}

impl PartialEq for MultivariatePolynomial {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.variables != other.variables {
            if self.nterms() != other.nterms() {
                return false;
            }

            let mut a = self.clone();
            let mut b = other.clone();
            a.unify_variables(&mut b);
            return a == b;
        }

        self.exponents.eq(&other.exponents) && self.coefficients.eq(&other.coefficients)
    }
}

impl Eq for MultivariatePolynomial {}

impl Display for MultivariatePolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for i in (0..self.nterms()).rev() {
            let c = &self.coefficients[i];
            if c.is_negative() {
                write!(f, "-")?;
            } else if i + 1 != self.nterms() {
                write!(f, "+")?;
            }

            let c = if c.is_negative() { c.neg() } else { c.clone() };
            let mut write_mul = false;
            if !c.is_one() || self.exponents(i).iter().all(|e| *e == 0) {
                write!(f, "{}", c)?;
                write_mul = true;
            }

            for (v, e) in self.variables.iter().zip(self.exponents(i)) {
                if *e == 0 {
                    continue;
                }

                if write_mul {
                    write!(f, "*")?;
                }
                write_mul = true;

                if *e == 1 {
                    write!(f, "{}", v)?;
                } else {
                    write!(f, "{}^{}", v, e)?;
                }
            }
        }

        Ok(())
    }
}

impl Add for MultivariatePolynomial {
    type Output = Self;

    fn add(mut self, mut other: Self) -> Self::Output {
        self.unify_variables(&mut other);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        // Merge the two polynomials, which are assumed to be already sorted.
        let nvars = self.nvars();
        let mut new_coefficients = vec![Coefficient::zero(); self.nterms() + other.nterms()];
        let mut new_exponents: Vec<u32> = vec![0; nvars * (self.nterms() + other.nterms())];
        let mut new_nterms = 0;
        let mut i = 0;
        let mut j = 0;

        macro_rules! insert_monomial {
            ($source:expr, $index:expr) => {
                mem::swap(
                    &mut new_coefficients[new_nterms],
                    &mut $source.coefficients[$index],
                );

                new_exponents[new_nterms * nvars..(new_nterms + 1) * nvars]
                    .clone_from_slice($source.exponents($index));
                new_nterms += 1;
            };
        }

        while i < self.nterms() && j < other.nterms() {
            let c = self.exponents(i).cmp(other.exponents(j));
            match c {
                Ordering::Less => {
                    insert_monomial!(self, i);
                    i += 1;
                }
                Ordering::Greater => {
                    insert_monomial!(other, j);
                    j += 1;
                }
                Ordering::Equal => {
                    self.coefficients[i] = self.coefficients[i].add(&other.coefficients[j]);
                    if !self.coefficients[i].is_zero() {
                        insert_monomial!(self, i);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            insert_monomial!(self, i);
            i += 1;
        }

        while j < other.nterms() {
            insert_monomial!(other, j);
            j += 1;
        }

        new_coefficients.truncate(new_nterms);
        new_exponents.truncate(nvars * new_nterms);

        Self {
            coefficients: new_coefficients,
            exponents: new_exponents,
            variables: self.variables,
        }
    }
}

impl<'a, 'b> Add<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn add(self, other: &'a MultivariatePolynomial) -> Self::Output {
        self.clone() + other.clone()
    }
}

impl Sub for MultivariatePolynomial {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b> Sub<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn sub(self, other: &'a MultivariatePolynomial) -> Self::Output {
        self.clone() + other.clone().neg()
    }
}

impl Neg for MultivariatePolynomial {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = c.neg();
        }
        self
    }
}

impl<'a, 'b> Mul<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn mul(self, rhs: &'a MultivariatePolynomial) -> Self::Output {
        if self.variables != rhs.variables {
            let mut a = self.clone();
            let mut b = rhs.clone();
            a.unify_variables(&mut b);
            return &a * &b;
        }

        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        if self.nterms() == 1 {
            return rhs
                .clone()
                .mul_monomial(&self.coefficients[0], &self.exponents);
        }

        if rhs.nterms() == 1 {
            return self
                .clone()
                .mul_monomial(&rhs.coefficients[0], &rhs.exponents);
        }

        self.mul_sparse(rhs)
    }
}

impl<'a> Mul<&'a MultivariatePolynomial> for MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial) -> Self::Output {
        (&self) * rhs
    }
}

impl Mul for MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    #[inline]
    fn mul(self, rhs: MultivariatePolynomial) -> Self::Output {
        (&self) * &rhs
    }
}

/// A view of a single term of a polynomial.
#[derive(Copy, Clone, Debug)]
pub struct MonomialView<'a> {
    pub coefficient: &'a Coefficient,
    pub exponents: &'a [u32],
}

/// Iterator over terms in a multivariate polynomial, from the smallest
/// to the leading term.
pub struct MonomialViewIterator<'a> {
    poly: &'a MultivariatePolynomial,
    index: usize,
}

impl<'a> Iterator for MonomialViewIterator<'a> {
    type Item = MonomialView<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.poly.nterms() {
            None
        } else {
            let view = MonomialView {
                coefficient: &self.poly.coefficients[self.index],
                exponents: self.poly.exponents(self.index),
            };
            self.index += 1;
            Some(view)
        }
    }
}

impl<'a> IntoIterator for &'a MultivariatePolynomial {
    type Item = MonomialView<'a>;
    type IntoIter = MonomialViewIterator<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            poly: self,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, coefficient::Coefficient, poly::PolyError, poly::Variable};

    use super::MultivariatePolynomial;

    fn p(s: &str) -> MultivariatePolynomial {
        Atom::parse(s).unwrap().to_polynomial().unwrap()
    }

    #[test]
    fn add_and_cancel() {
        let a = p("3y-2x+1");
        let b = p("5y+2x+4");
        let r = &a + &b;
        r.check_consistency();
        assert_eq!(r, p("8y+5"));
        assert!((&a - &a).is_zero());
        assert_eq!(a.clone() + a.zero(), a);
    }

    #[test]
    fn multiply() {
        let r = &p("x-y") * &p("x+y");
        r.check_consistency();
        assert_eq!(r, p("x^2-y^2"));
        assert_eq!(r.to_string(), "x^2-y^2");

        let s = &p("x+3") * &p("x+3");
        assert_eq!(s.to_string(), "x^2+6*x+9");

        let t = &p("x*y + 1/2") * &p("z - 2");
        t.check_consistency();
        assert_eq!(t, p("x*y*z - 2*x*y + z/2 - 1"));
    }

    #[test]
    fn power() {
        assert_eq!(p("x+y").pow(3), p("x^3+3x^2*y+3x*y^2+y^3"));
        assert_eq!(p("x+y").pow(0), p("1"));
        assert_eq!(p("2/3").pow(2), p("4/9"));

        assert_eq!(p("x^3*y + y^7").max_degree(), 7);
        assert_eq!(p("5").max_degree(), 0);

        assert_eq!(p("x+3").checked_pow(&p("2")), Ok(p("x^2+6x+9")));
        assert!(matches!(
            p("x+3").checked_pow(&p("x+1")),
            Err(PolyError::Undefined(_))
        ));
        assert!(matches!(
            p("x+3").checked_pow(&p("1/2")),
            Err(PolyError::Undefined(_))
        ));
    }

    #[test]
    fn variable_alignment() {
        let a = p("z + 1");
        let b = p("x*y");
        let r = &a * &b;
        let names: Vec<String> = r.get_vars_ref().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(r.to_string(), "x*y*z+x*y");
    }

    #[test]
    fn append_and_helpers() {
        let x = p("x + y");
        let mut q = x.zero();
        q.append_monomial(Coefficient::from(2), &[0, 1]);
        q.append_monomial(Coefficient::from(1), &[2, 0]);
        q.append_monomial(Coefficient::from(-2), &[0, 1]);
        q.append_monomial(Coefficient::from(5), &[0, 0]);
        q.check_consistency();
        assert_eq!(q, p("x^2 + 5"));

        let m = p("2x^2*y + 4y").make_monic();
        assert_eq!(m, p("x^2*y + 2y"));
        assert_eq!(m.lcoeff(), Coefficient::one());
        assert_eq!(m.degree(0), 2);
        assert_eq!(m.lead_monomial().exponents.as_slice(), &[2, 1]);
    }

    #[test]
    fn prune_and_rename() {
        let a = (&p("x + y") - &p("y")).prune_variables();
        assert_eq!(a.nvars(), 1);
        assert_eq!(a, p("x"));

        let b = p("x^2 + y");
        let renamed = b.rename_variables(&[Variable::Temporary(1), Variable::Temporary(0)]);
        renamed.check_consistency();
        assert_eq!(renamed.get_vars_ref(), &[Variable::Temporary(0), Variable::Temporary(1)]);
        assert_eq!(renamed.to_string(), "_TMP_0+_TMP_1^2");
    }
}
