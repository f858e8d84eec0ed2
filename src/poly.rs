pub mod gcd;
pub mod groebner;
pub mod monomial;
pub mod polynomial;
pub mod rational;
pub mod recursive;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Display;
use std::sync::Arc;

use crate::atom::{Atom, Operator};
use crate::coefficient::Coefficient;
use crate::normalize::MAX_FOLDED_EXPONENT;
use crate::state::{State, Symbol};

use self::polynomial::MultivariatePolynomial;

pub const INLINED_EXPONENTS: usize = 6;

/// A polynomial variable. It is either a symbol, an expression that
/// cannot be decomposed further and is treated as a single variable,
/// or a temporary variable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Variable {
    Symbol(Symbol),
    /// An expression such as `sin(x)` or `x^(1/2)`.
    Opaque(Arc<Atom>),
    Temporary(usize),
}

impl From<Symbol> for Variable {
    fn from(i: Symbol) -> Variable {
        Variable::Symbol(i)
    }
}

impl Variable {
    pub fn to_id(&self) -> Option<Symbol> {
        match self {
            Variable::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    /// Convert the variable to an expression. Temporary variables
    /// become the symbol `_TMP_n`.
    pub fn to_atom(&self) -> Atom {
        match self {
            Variable::Symbol(s) => Atom::Var(*s),
            Variable::Opaque(a) => a.as_ref().clone(),
            Variable::Temporary(t) => Atom::Var(State::get_symbol(&format!("_TMP_{}", t))),
        }
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Symbols and opaque expressions are ordered by the default order on atoms.
/// Temporary variables come last.
impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Variable::Temporary(t1), Variable::Temporary(t2)) => t1.cmp(t2),
            (Variable::Temporary(_), _) => Ordering::Greater,
            (_, Variable::Temporary(_)) => Ordering::Less,
            (Variable::Symbol(s1), Variable::Symbol(s2)) => Atom::Var(*s1).cmp(&Atom::Var(*s2)),
            (Variable::Symbol(s1), Variable::Opaque(a2)) => Atom::Var(*s1).cmp(a2),
            (Variable::Opaque(a1), Variable::Symbol(s2)) => a1.as_ref().cmp(&Atom::Var(*s2)),
            (Variable::Opaque(a1), Variable::Opaque(a2)) => a1.cmp(a2),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Variable::Symbol(v) => write!(f, "{}", v),
            Variable::Opaque(a) => match a.as_ref() {
                Atom::Var(_) | Atom::Fun(_, _) => write!(f, "{}", a),
                a => write!(f, "({})", a),
            },
            Variable::Temporary(t) => write!(f, "_TMP_{}", t),
        }
    }
}

/// Errors of the polynomial engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolyError {
    /// The expression has no polynomial representation. Callers usually
    /// recover by treating the expression as a single variable.
    NotAPolynomial(Cow<'static, str>),
    /// The expression tree violates its shape contract, for example an
    /// operator with the wrong number of operands.
    Malformed(Cow<'static, str>),
    /// The operation has no defined result, such as a polynomial power
    /// or a division by zero.
    Undefined(Cow<'static, str>),
    /// Buchberger's algorithm did not finish within its step budget.
    BudgetExceeded { steps: usize },
    /// The computation was cancelled through its abort flag.
    Aborted,
}

impl Display for PolyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolyError::NotAPolynomial(r) => write!(f, "Not a polynomial: {}", r),
            PolyError::Malformed(r) => write!(f, "Malformed expression: {}", r),
            PolyError::Undefined(r) => write!(f, "Undefined result: {}", r),
            PolyError::BudgetExceeded { steps } => write!(
                f,
                "The Groebner basis computation did not finish within {} steps",
                steps
            ),
            PolyError::Aborted => write!(f, "The computation was aborted"),
        }
    }
}

impl std::error::Error for PolyError {}

/// Create a polynomial that is a single opaque variable.
fn opaque(a: &Atom) -> MultivariatePolynomial {
    match a.normalize() {
        Atom::Num(n) => MultivariatePolynomial::new_constant(n),
        Atom::Var(s) => MultivariatePolynomial::new_variable(Variable::Symbol(s)),
        a => MultivariatePolynomial::new_variable(Variable::Opaque(Arc::new(a))),
    }
}

impl Atom {
    /// Convert an expression to a polynomial with rational coefficients.
    ///
    /// Function calls, subscripts, primes and any subexpression that cannot be
    /// decomposed become single variables. Fractional powers `b^(n/d)` become the
    /// `n`th power of the variable `b^(1/d)`. A negative power or a division by
    /// zero yields [`PolyError::NotAPolynomial`], and an operator with the wrong
    /// number of operands anywhere in the tree yields [`PolyError::Malformed`].
    ///
    /// Powers and products whose exponents do not fit in a `u32`, and powers
    /// larger than the folding bound of [`Atom::normalize`] that would expand a
    /// sum or a coefficient, are kept as a single variable.
    pub fn to_polynomial(&self) -> Result<MultivariatePolynomial, PolyError> {
        if let Some((op, n)) = self.find_malformed() {
            return Err(PolyError::Malformed(
                format!("operator {:?} cannot have {} operands", op, n).into(),
            ));
        }

        self.to_polynomial_impl()
    }

    fn to_polynomial_impl(&self) -> Result<MultivariatePolynomial, PolyError> {
        if let Some(c) = self.evaluate_to_constant() {
            return Ok(MultivariatePolynomial::new_constant(c));
        }

        let (op, args) = match self {
            Atom::Num(n) => return Ok(MultivariatePolynomial::new_constant(n.clone())),
            Atom::Var(s) => return Ok(MultivariatePolynomial::new_variable(Variable::Symbol(*s))),
            Atom::Fun(_, _) => return Ok(opaque(self)),
            Atom::Op(op, args) => (*op, args),
        };

        match op {
            Operator::Add => {
                let mut r = MultivariatePolynomial::new_constant(Coefficient::zero());
                for a in args {
                    r = r + a.to_polynomial_impl()?;
                }
                Ok(r)
            }
            Operator::Mul => {
                let mut r = MultivariatePolynomial::new_constant(Coefficient::one());
                for a in args {
                    let a = a.to_polynomial_impl()?;
                    if r.max_degree().checked_add(a.max_degree()).is_none() {
                        return Ok(opaque(self));
                    }
                    r = &r * &a;
                }
                Ok(r)
            }
            Operator::Sub => Ok(args[0].to_polynomial_impl()? - args[1].to_polynomial_impl()?),
            Operator::Neg => Ok(-args[0].to_polynomial_impl()?),
            Operator::Div => match args[1].evaluate_to_constant() {
                Some(d) if d.is_zero() => Err(PolyError::NotAPolynomial(
                    format!("division by zero in {}", self).into(),
                )),
                Some(d) => Ok(args[0].to_polynomial_impl()?.mul_coeff(&d.inv())),
                None => Ok(opaque(self)),
            },
            Operator::Pow => {
                let Some(e) = args[1].evaluate_to_constant() else {
                    return Ok(opaque(self));
                };

                if e.is_negative() {
                    return Err(PolyError::NotAPolynomial(
                        format!("negative power in {}", self).into(),
                    ));
                }

                match e.to_fraction() {
                    Some((n, 1)) if n <= u32::MAX as i64 => {
                        let base = args[0].to_polynomial_impl()?;
                        if !fits_power(&base, n) {
                            return Ok(opaque(self));
                        }
                        Ok(base.pow(n as u64))
                    }
                    Some((n, d)) if d != 1 && n <= u32::MAX as i64 => {
                        let root = Atom::pow(args[0].clone(), Atom::new_num(Coefficient::new(1, d)));
                        Ok(opaque(&root).pow(n as u64))
                    }
                    _ => Ok(opaque(self)),
                }
            }
            Operator::Subscript | Operator::Prime => Ok(opaque(self)),
        }
    }
}

/// Check if `base^n` can be expanded: its exponents fit in a `u32`, and a
/// power above the folding bound only raises a monomial with a unit coefficient.
fn fits_power(base: &MultivariatePolynomial, n: i64) -> bool {
    if (base.max_degree() as u64) * (n as u64) > u32::MAX as u64 {
        return false;
    }

    if n <= MAX_FOLDED_EXPONENT || base.nterms() == 0 {
        return true;
    }

    let c = base.lcoeff();
    base.nterms() == 1 && !base.is_constant() && (c.is_one() || c.neg().is_one())
}

impl MultivariatePolynomial {
    /// Convert the polynomial to a normalized expression.
    pub fn to_expression(&self) -> Atom {
        let mut terms = Vec::with_capacity(self.nterms());

        for t in self {
            let mut factors = vec![];
            if !t.coefficient.is_one() {
                factors.push(Atom::Num(t.coefficient.clone()));
            }

            for (v, e) in self.variables.iter().zip(t.exponents) {
                match *e {
                    0 => {}
                    1 => factors.push(v.to_atom()),
                    e => factors.push(Atom::pow(v.to_atom(), Atom::new_num(e as i64))),
                }
            }

            terms.push(match factors.len() {
                0 => Atom::new_num(1),
                1 => factors.pop().unwrap_or_default(),
                _ => Atom::mul(factors),
            });
        }

        let sum = match terms.len() {
            0 => Atom::new_num(0),
            1 => terms.pop().unwrap_or_default(),
            _ => Atom::add(terms),
        };

        sum.normalize()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::{
        atom::{Atom, Operator},
        poly::{PolyError, Variable},
        state::State,
    };

    fn p(s: &str) -> super::MultivariatePolynomial {
        Atom::parse(s).unwrap().to_polynomial().unwrap()
    }

    #[test]
    fn constants_and_symbols() {
        let c = p("(1+2)*3/4");
        assert!(c.is_constant());
        assert_eq!(c.to_string(), "9/4");

        let x = p("x");
        assert_eq!(x.nterms(), 1);
        assert_eq!(
            x.get_vars_ref(),
            &[Variable::Symbol(State::get_symbol("x"))]
        );

        // reserved constants are ordinary variables
        assert_eq!(p("pi^2 + 1").nvars(), 1);
    }

    #[test]
    fn opaque_subexpressions() {
        // only the function call itself is opaque
        let a = p("sin(x)^2 + x");
        assert_eq!(a.nvars(), 2);
        assert!(a
            .get_vars_ref()
            .contains(&Variable::Opaque(Arc::new(Atom::parse("sin(x)").unwrap().normalize()))));
        assert_eq!(a.nterms(), 2);

        let f = p("(x+1)*sin(y) - sin(y)");
        assert_eq!(f.nvars(), 2);
        assert_eq!(f.nterms(), 1);

        let b = p("x/y + 1");
        assert_eq!(b.nvars(), 1);
        assert_eq!(b.nterms(), 2);

        let c = p("x_1 * x_1");
        assert_eq!(c.nvars(), 1);
        assert_eq!(c.degree(0), 2);

        let d = p("y^z");
        assert_eq!(d.nvars(), 1);
    }

    #[test]
    fn fractional_powers() {
        let a = p("x^(3/2) + x^(1/2)");
        assert_eq!(a.nvars(), 1);
        assert_eq!(
            a.get_vars_ref()[0],
            Variable::Opaque(Arc::new(Atom::parse("x^(1/2)").unwrap().normalize()))
        );
        assert_eq!(a.degree(0), 3);
    }

    #[test]
    fn failures() {
        assert!(matches!(
            Atom::parse("x^-2").unwrap().to_polynomial(),
            Err(PolyError::NotAPolynomial(_))
        ));
        assert!(matches!(
            Atom::parse("x/(1-1)").unwrap().to_polynomial(),
            Err(PolyError::NotAPolynomial(_))
        ));
        assert!(matches!(
            Atom::Op(Operator::Pow, vec![Atom::new_var("x")]).to_polynomial(),
            Err(PolyError::Malformed(_))
        ));
        assert!(matches!(
            Atom::add(vec![Atom::new_var("x"), Atom::Op(Operator::Neg, vec![])]).to_polynomial(),
            Err(PolyError::Malformed(_))
        ));
    }

    #[test]
    fn malformed_below_the_root() {
        let empty_neg = || Atom::Op(Operator::Neg, vec![]);

        // a bad exponent must not turn into a negative power error
        assert!(matches!(
            Atom::pow(empty_neg(), Atom::new_num(-1)).to_polynomial(),
            Err(PolyError::Malformed(_))
        ));

        // a function elsewhere in the sum does not hide the bad operand
        let sin_x = Atom::new_fun("sin", vec![Atom::new_var("x")]);
        assert!(matches!(
            Atom::add(vec![sin_x, empty_neg()]).to_polynomial(),
            Err(PolyError::Malformed(_))
        ));

        // nor does a function argument
        let f = Atom::new_fun("f", vec![empty_neg()]);
        assert!(matches!(
            Atom::add(vec![f, Atom::new_var("x")]).to_polynomial(),
            Err(PolyError::Malformed(_))
        ));
    }

    #[test]
    fn huge_exponents() {
        let a = p("(x^2)^3000000000");
        assert_eq!(a.nvars(), 1);
        assert!(matches!(a.get_vars_ref()[0], Variable::Opaque(_)));

        let b = p("x^4000000000*x^4000000000");
        assert_eq!(b.nvars(), 1);
        assert!(matches!(b.get_vars_ref()[0], Variable::Opaque(_)));

        assert_eq!(p("x^4000000000").degree(0), 4000000000);

        let c = p("x + 3^(2^40)");
        assert_eq!(c.nvars(), 2);
        assert_eq!(c.nterms(), 2);

        let d = p("(x+1)^100000");
        assert_eq!(d.nvars(), 1);
        assert!(matches!(d.get_vars_ref()[0], Variable::Opaque(_)));
    }

    #[test]
    fn round_trip() {
        for s in ["(x+3)^2", "x*y - 2/3*y^3 + 7", "(a+b)^3 - a^3", "x^(3/2)*y", "0"] {
            let once = p(s).to_expression();
            assert_eq!(once, Atom::parse(s).unwrap().to_polynomial().unwrap().to_expression());
            let twice = once.to_polynomial().unwrap().to_expression();
            assert_eq!(once, twice, "{}", s);
        }

        assert_eq!(
            p("(x+3)^2").to_expression(),
            Atom::parse("x^2+6x+9").unwrap().normalize()
        );
    }
}
