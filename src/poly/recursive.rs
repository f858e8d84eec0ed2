//! A recursive view of a polynomial: a polynomial in its most significant
//! variable whose coefficients are polynomials in the remaining variables.

use std::fmt::Display;
use std::sync::Arc;

use crate::coefficient::Coefficient;

use super::polynomial::MultivariatePolynomial;
use super::Variable;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecursivePolynomial {
    Constant(Coefficient),
    /// A polynomial in `variable`. The exponents of the terms are strictly
    /// increasing, every coefficient is non-zero, and the polynomial is never
    /// a single term with exponent zero.
    Univariate {
        variable: Variable,
        terms: Vec<(u32, RecursivePolynomial)>,
    },
}

impl MultivariatePolynomial {
    /// Convert the polynomial to its recursive form, with the first variable outermost.
    /// Variables that do not occur in a coefficient are skipped.
    pub fn to_recursive(&self) -> RecursivePolynomial {
        let terms: Vec<_> = self
            .into_iter()
            .map(|t| (t.exponents, t.coefficient))
            .collect();
        self.build_recursive(&terms, 0)
    }

    fn build_recursive(&self, terms: &[(&[u32], &Coefficient)], var: usize) -> RecursivePolynomial {
        if terms.is_empty() {
            return RecursivePolynomial::Constant(Coefficient::zero());
        }

        if var == self.nvars() {
            debug_assert_eq!(terms.len(), 1);
            return RecursivePolynomial::Constant(terms[0].1.clone());
        }

        // terms are sorted, so equal exponents of `var` are adjacent
        let mut groups: Vec<(u32, &[(&[u32], &Coefficient)])> = vec![];
        let mut start = 0;
        for i in 1..=terms.len() {
            if i == terms.len() || terms[i].0[var] != terms[start].0[var] {
                groups.push((terms[start].0[var], &terms[start..i]));
                start = i;
            }
        }

        if groups.len() == 1 && groups[0].0 == 0 {
            return self.build_recursive(terms, var + 1);
        }

        RecursivePolynomial::Univariate {
            variable: self.variables[var].clone(),
            terms: groups
                .into_iter()
                .map(|(e, g)| (e, self.build_recursive(g, var + 1)))
                .collect(),
        }
    }
}

impl RecursivePolynomial {
    pub fn is_zero(&self) -> bool {
        matches!(self, RecursivePolynomial::Constant(c) if c.is_zero())
    }

    /// The leading term: the variables and exponents found by repeatedly
    /// taking the highest term, outermost first, and the final coefficient.
    pub fn initial_term(&self) -> (Vec<(&Variable, u32)>, &Coefficient) {
        let mut powers = vec![];
        let mut cur = self;
        loop {
            match cur {
                RecursivePolynomial::Constant(c) => return (powers, c),
                RecursivePolynomial::Univariate { variable, terms } => match terms.last() {
                    Some((e, c)) => {
                        if *e > 0 {
                            powers.push((variable, *e));
                        }
                        cur = c;
                    }
                    None => unreachable!("Empty univariate polynomial"),
                },
            }
        }
    }

    fn collect_variables(&self, vars: &mut Vec<Variable>) {
        if let RecursivePolynomial::Univariate { variable, terms } = self {
            if !vars.contains(variable) {
                vars.push(variable.clone());
            }
            for (_, c) in terms {
                c.collect_variables(vars);
            }
        }
    }

    fn add_terms(
        &self,
        variables: &[Variable],
        exp: &mut Vec<u32>,
        res: &mut MultivariatePolynomial,
    ) {
        match self {
            RecursivePolynomial::Constant(c) => res.append_monomial(c.clone(), exp),
            RecursivePolynomial::Univariate { variable, terms } => {
                let index = variables.iter().position(|v| v == variable).unwrap_or_default();
                for (e, c) in terms {
                    exp[index] += e;
                    c.add_terms(variables, exp, res);
                    exp[index] -= e;
                }
            }
        }
    }

    /// Convert back to the sparse form with a sorted variable list.
    pub fn to_polynomial(&self) -> MultivariatePolynomial {
        let mut vars = vec![];
        self.collect_variables(&mut vars);
        vars.sort();

        let mut res = MultivariatePolynomial::new(None, Arc::new(vars));
        let mut exp = vec![0; res.nvars()];
        let vars = res.get_vars();
        self.add_terms(&vars, &mut exp, &mut res);
        res
    }

    fn nterms(&self) -> usize {
        match self {
            RecursivePolynomial::Constant(c) => usize::from(!c.is_zero()),
            RecursivePolynomial::Univariate { terms, .. } => {
                terms.iter().map(|(_, c)| c.nterms()).sum()
            }
        }
    }
}

impl Display for RecursivePolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (variable, terms) = match self {
            RecursivePolynomial::Constant(c) => return write!(f, "{}", c),
            RecursivePolynomial::Univariate { variable, terms } => (variable, terms),
        };

        let mut first = true;
        for (e, c) in terms.iter().rev() {
            let s = match c {
                RecursivePolynomial::Constant(c) if *e > 0 && c.is_one() => String::new(),
                RecursivePolynomial::Constant(c) if *e > 0 && c.neg().is_one() => "-".to_string(),
                c if *e > 0 && c.nterms() > 1 => format!("({})*", c),
                c if *e > 0 => format!("{}*", c),
                c => format!("{}", c),
            };

            if !first && !s.starts_with('-') {
                write!(f, "+")?;
            }
            first = false;

            match e {
                0 => write!(f, "{}", s)?,
                1 => write!(f, "{}{}", s, variable)?,
                e => write!(f, "{}{}^{}", s, variable, e)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, coefficient::Coefficient, poly::Variable, state::State};

    use super::RecursivePolynomial;

    #[test]
    fn nested_form() {
        let p = Atom::parse("x^2*y + x*y + 3").unwrap().to_polynomial().unwrap();
        let r = p.to_recursive();

        let y = Variable::Symbol(State::get_symbol("y"));
        let y_poly = RecursivePolynomial::Univariate {
            variable: y,
            terms: vec![(1, RecursivePolynomial::Constant(Coefficient::one()))],
        };

        assert_eq!(
            r,
            RecursivePolynomial::Univariate {
                variable: Variable::Symbol(State::get_symbol("x")),
                terms: vec![
                    (0, RecursivePolynomial::Constant(Coefficient::from(3))),
                    (1, y_poly.clone()),
                    (2, y_poly),
                ]
            }
        );

        assert_eq!(r.to_string(), "y*x^2+y*x+3");
        assert_eq!(r.to_polynomial(), p);
    }

    #[test]
    fn collapse_and_initial_term() {
        let p = Atom::parse("(y+1)*(x-1)^2 + 5").unwrap().to_polynomial().unwrap();
        let r = p.to_recursive();
        let (powers, c) = r.initial_term();

        let lead = p.lead_monomial();
        let expected: Vec<_> = lead.powers(p.get_vars_ref()).collect();
        assert_eq!(powers, expected);
        assert_eq!(*c, lead.coefficient);
        assert_eq!(r.to_string(), "(y+1)*x^2+(-2*y-2)*x+y+6");
        assert_eq!(r.to_polynomial(), p);

        // a polynomial without the outer variable skips its level
        let q = Atom::parse("y^2 + 1").unwrap().to_polynomial().unwrap();
        assert!(matches!(q.to_recursive(), RecursivePolynomial::Univariate { variable: Variable::Symbol(s), .. } if s == State::get_symbol("y")));
        assert!(Atom::parse("0").unwrap().to_polynomial().unwrap().to_recursive().is_zero());
    }
}
