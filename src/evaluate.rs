use crate::{
    atom::{Atom, Operator},
    coefficient::Coefficient,
    normalize::MAX_FOLDED_EXPONENT,
};

impl Atom {
    /// Evaluate an expression that contains no variables or function calls to
    /// an exact rational number.
    ///
    /// Returns `None` when the expression is not constant, when it divides by
    /// zero, or when a power does not have an integer exponent. Powers with an
    /// exponent larger than the folding bound of [`Atom::normalize`] are not evaluated.
    pub fn evaluate_to_constant(&self) -> Option<Coefficient> {
        match self {
            Atom::Num(n) => Some(n.clone()),
            Atom::Var(_) | Atom::Fun(_, _) => None,
            Atom::Op(op, args) => {
                if !op.accepts(args.len()) {
                    return None;
                }

                match op {
                    Operator::Add => {
                        let mut r = Coefficient::zero();
                        for a in args {
                            r = r.add(&a.evaluate_to_constant()?);
                        }
                        Some(r)
                    }
                    Operator::Mul => {
                        let mut r = Coefficient::one();
                        for a in args {
                            r = r.mul(&a.evaluate_to_constant()?);
                        }
                        Some(r)
                    }
                    Operator::Sub => {
                        let a = args[0].evaluate_to_constant()?;
                        let b = args[1].evaluate_to_constant()?;
                        Some(a.sub(&b))
                    }
                    Operator::Neg => Some(args[0].evaluate_to_constant()?.neg()),
                    Operator::Div => {
                        let a = args[0].evaluate_to_constant()?;
                        let b = args[1].evaluate_to_constant()?;
                        if b.is_zero() {
                            None
                        } else {
                            Some(a.div(&b))
                        }
                    }
                    Operator::Pow => {
                        let b = args[0].evaluate_to_constant()?;
                        let e = args[1].evaluate_to_constant()?.to_i64()?;

                        if b.is_one() || (b.is_zero() && e > 0) {
                            return Some(b);
                        }

                        if b.neg().is_one() {
                            return Some(if e % 2 == 0 { b.neg() } else { b });
                        }

                        if e.unsigned_abs() > MAX_FOLDED_EXPONENT as u64 {
                            return None;
                        }

                        if e >= 0 {
                            Some(b.pow(e as u64))
                        } else if b.is_zero() {
                            None
                        } else {
                            Some(b.inv().pow(e.unsigned_abs()))
                        }
                    }
                    Operator::Subscript | Operator::Prime => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, coefficient::Coefficient};

    #[test]
    fn constant() {
        let a = Atom::parse("(1+2)*3/4 - 2^-2").unwrap();
        assert_eq!(a.evaluate_to_constant(), Some(Coefficient::new(2, 1)));

        let b = Atom::parse("-(2/3)^3").unwrap();
        assert_eq!(b.evaluate_to_constant(), Some(Coefficient::new(-8, 27)));
    }

    #[test]
    fn not_constant() {
        assert_eq!(Atom::parse("1 + x").unwrap().evaluate_to_constant(), None);
        assert_eq!(Atom::parse("f(2)").unwrap().evaluate_to_constant(), None);
        assert_eq!(Atom::parse("1/(2-2)").unwrap().evaluate_to_constant(), None);
        assert_eq!(Atom::parse("4^(1/2)").unwrap().evaluate_to_constant(), None);
        assert_eq!(Atom::parse("0^-1").unwrap().evaluate_to_constant(), None);
    }

    #[test]
    fn large_powers_stay_unevaluated() {
        assert_eq!(Atom::parse("3^(2^40)").unwrap().evaluate_to_constant(), None);
        assert_eq!(Atom::parse("2^-5000").unwrap().evaluate_to_constant(), None);
        assert_eq!(
            Atom::parse("1^(2^40)").unwrap().evaluate_to_constant(),
            Some(Coefficient::one())
        );
        assert_eq!(
            Atom::parse("(-1)^(2^40+1)").unwrap().evaluate_to_constant(),
            Some(Coefficient::from(-1))
        );
        assert_eq!(
            Atom::parse("0^(2^40)").unwrap().evaluate_to_constant(),
            Some(Coefficient::zero())
        );
        assert_eq!(
            Atom::parse("2^4096").unwrap().evaluate_to_constant(),
            Some(Coefficient::from(2).pow(4096))
        );
    }
}
