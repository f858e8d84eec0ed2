use ahash::HashMap;

use crate::{
    atom::{Atom, Operator},
    coefficient::Coefficient,
};

/// Numeric powers with an exponent above this bound are kept unevaluated.
pub(crate) const MAX_FOLDED_EXPONENT: i64 = 1 << 12;

impl Atom {
    /// Bring the expression into a normal form: numbers are folded, sums and
    /// products are flattened, like terms and like factors are collected, and
    /// the operands of sums and products are sorted by the default order.
    ///
    /// Subtraction, negation and division are rewritten in terms of sums,
    /// products and powers. Products are never expanded.
    pub fn normalize(&self) -> Atom {
        match self {
            Atom::Num(_) | Atom::Var(_) => self.clone(),
            Atom::Fun(f, args) => Atom::Fun(*f, args.iter().map(|a| a.normalize()).collect()),
            Atom::Op(op, args) => {
                let mut args: Vec<Atom> = args.iter().map(|a| a.normalize()).collect();

                if !op.accepts(args.len()) {
                    return Atom::Op(*op, args);
                }

                match op {
                    Operator::Add => normalize_add(args),
                    Operator::Mul => normalize_mul(args),
                    Operator::Sub => {
                        let b = args.pop().unwrap_or_default();
                        let a = args.pop().unwrap_or_default();
                        normalize_add(vec![a, normalize_mul(vec![Atom::new_num(-1), b])])
                    }
                    Operator::Neg => {
                        let a = args.pop().unwrap_or_default();
                        normalize_mul(vec![Atom::new_num(-1), a])
                    }
                    Operator::Div => {
                        let b = args.pop().unwrap_or_default();
                        let a = args.pop().unwrap_or_default();
                        normalize_mul(vec![a, normalize_pow(b, Atom::new_num(-1))])
                    }
                    Operator::Pow => {
                        let e = args.pop().unwrap_or_default();
                        let b = args.pop().unwrap_or_default();
                        normalize_pow(b, e)
                    }
                    Operator::Subscript | Operator::Prime => Atom::Op(*op, args),
                }
            }
        }
    }
}

/// Split a normalized term into its numerical coefficient and the rest.
fn split_coefficient(a: Atom) -> (Coefficient, Atom) {
    match a {
        Atom::Num(n) => (n, Atom::new_num(1)),
        Atom::Op(Operator::Mul, mut factors) if matches!(factors.first(), Some(Atom::Num(_))) => {
            let c = match factors.remove(0) {
                Atom::Num(n) => n,
                _ => unreachable!(),
            };

            if factors.len() == 1 {
                (c, factors.pop().unwrap_or_default())
            } else {
                (c, Atom::Op(Operator::Mul, factors))
            }
        }
        a => (Coefficient::one(), a),
    }
}

/// The inverse of `split_coefficient`.
fn attach_coefficient(c: Coefficient, rest: Atom) -> Atom {
    if c.is_one() {
        return rest;
    }

    match rest {
        Atom::Op(Operator::Mul, factors) => {
            let mut new_factors = Vec::with_capacity(factors.len() + 1);
            new_factors.push(Atom::Num(c));
            new_factors.extend(factors);
            Atom::Op(Operator::Mul, new_factors)
        }
        rest => Atom::Op(Operator::Mul, vec![Atom::Num(c), rest]),
    }
}

fn flatten(args: Vec<Atom>, op: Operator) -> Vec<Atom> {
    let mut res = Vec::with_capacity(args.len());
    for a in args {
        match a {
            Atom::Op(o, inner) if o == op => res.extend(inner),
            a => res.push(a),
        }
    }
    res
}

fn normalize_add(args: Vec<Atom>) -> Atom {
    let mut constant = Coefficient::zero();
    let mut terms: HashMap<Atom, Coefficient> = HashMap::default();

    for a in flatten(args, Operator::Add) {
        if let Atom::Num(n) = &a {
            constant = constant.add(n);
            continue;
        }

        let (c, rest) = split_coefficient(a);
        let entry = terms.entry(rest).or_insert_with(Coefficient::zero);
        *entry = entry.add(&c);
    }

    let mut res: Vec<Atom> = terms
        .into_iter()
        .filter(|(_, c)| !c.is_zero())
        .map(|(rest, c)| attach_coefficient(c, rest))
        .collect();

    if !constant.is_zero() {
        res.push(Atom::Num(constant));
    }

    res.sort();

    match res.len() {
        0 => Atom::new_num(0),
        1 => res.pop().unwrap_or_default(),
        _ => Atom::Op(Operator::Add, res),
    }
}

fn normalize_mul(args: Vec<Atom>) -> Atom {
    let mut coeff = Coefficient::one();

    // base -> numerical exponent
    let mut powers: HashMap<Atom, Coefficient> = HashMap::default();

    for a in flatten(args, Operator::Mul) {
        match a {
            Atom::Num(n) => coeff = coeff.mul(&n),
            Atom::Op(Operator::Pow, mut be) if be.len() == 2 && matches!(be[1], Atom::Num(_)) => {
                let e = match be.pop() {
                    Some(Atom::Num(e)) => e,
                    _ => unreachable!(),
                };
                let b = be.pop().unwrap_or_default();
                let entry = powers.entry(b).or_insert_with(Coefficient::zero);
                *entry = entry.add(&e);
            }
            a => {
                let entry = powers.entry(a).or_insert_with(Coefficient::zero);
                *entry = entry.add(&Coefficient::one());
            }
        }
    }

    if coeff.is_zero() {
        return Atom::new_num(0);
    }

    let mut factors = vec![];
    for (base, exp) in powers {
        match normalize_pow(base, Atom::Num(exp)) {
            Atom::Num(n) => coeff = coeff.mul(&n),
            Atom::Op(Operator::Mul, inner) => {
                for f in inner {
                    if let Atom::Num(n) = f {
                        coeff = coeff.mul(&n);
                    } else {
                        factors.push(f);
                    }
                }
            }
            f => factors.push(f),
        }
    }

    if coeff.is_zero() {
        return Atom::new_num(0);
    }

    factors.sort();

    if factors.is_empty() {
        Atom::Num(coeff)
    } else if factors.len() == 1 && coeff.is_one() {
        factors.pop().unwrap_or_default()
    } else {
        attach_coefficient(coeff, Atom::Op(Operator::Mul, factors))
    }
}

fn normalize_pow(base: Atom, exp: Atom) -> Atom {
    let e = match &exp {
        Atom::Num(e) => e.clone(),
        _ => {
            if base.is_one() {
                return Atom::new_num(1);
            }
            return Atom::Op(Operator::Pow, vec![base, exp]);
        }
    };

    if e.is_zero() {
        return Atom::new_num(1);
    }
    if e.is_one() {
        return base;
    }

    match base {
        Atom::Num(b) => {
            if b.is_one() {
                return Atom::new_num(1);
            }

            match e.to_i64() {
                Some(n) if n.abs() <= MAX_FOLDED_EXPONENT => {
                    if n > 0 {
                        Atom::Num(b.pow(n as u64))
                    } else if !b.is_zero() {
                        Atom::Num(b.inv().pow(n.unsigned_abs()))
                    } else {
                        Atom::Op(Operator::Pow, vec![Atom::Num(b), exp])
                    }
                }
                _ => Atom::Op(Operator::Pow, vec![Atom::Num(b), exp]),
            }
        }
        Atom::Op(Operator::Pow, mut be)
            if be.len() == 2 && e.is_integer() && matches!(be[1], Atom::Num(_)) =>
        {
            let e2 = match be.pop() {
                Some(Atom::Num(e2)) => e2,
                _ => unreachable!(),
            };
            let b = be.pop().unwrap_or_default();
            normalize_pow(b, Atom::Num(e2.mul(&e)))
        }
        Atom::Op(Operator::Mul, factors) if e.is_integer() => normalize_mul(
            factors
                .into_iter()
                .map(|f| normalize_pow(f, Atom::Num(e.clone())))
                .collect(),
        ),
        base => Atom::Op(Operator::Pow, vec![base, exp]),
    }
}

#[cfg(test)]
mod test {
    use crate::atom::Atom;

    fn n(s: &str) -> Atom {
        Atom::parse(s).unwrap().normalize()
    }

    #[test]
    fn fold_numbers() {
        assert_eq!(n("2+3*4-1/2"), Atom::parse("27/2").unwrap().normalize());
        assert_eq!(n("2^10"), Atom::new_num(1024));
        assert_eq!(n("(2/3)^-2"), n("9/4"));
    }

    #[test]
    fn collect_terms() {
        assert_eq!(n("x + 2*x - 3*x"), Atom::new_num(0));
        assert_eq!(n("x + y + x"), n("2*x + y"));
        assert_eq!(n("x*x*y/x"), n("x*y"));
        assert_eq!(n("x - y - x"), n("-y"));
    }

    #[test]
    fn canonical_order() {
        assert_eq!(n("x^2+6x+9"), n("9+x*6+x*x"));
        assert_eq!(n("y*x*3"), n("3*x*y"));
        assert_eq!(n("(x*y)^2"), n("x^2*y^2"));
    }

    #[test]
    fn powers() {
        assert_eq!(n("x^0"), Atom::new_num(1));
        assert_eq!(n("x^1"), Atom::new_var("x"));
        assert_eq!(n("(x^2)^3"), n("x^6"));
        assert_eq!(n("2^(1/2)*2^(1/2)"), Atom::new_num(2));
        assert_eq!(n("1^y"), Atom::new_num(1));
    }

    #[test]
    fn idempotent() {
        for s in ["x^2+6x+9", "(a+b)*(c+d)/(e+f)", "sin(x)^2 - 3*y_1 + f'", "2^(1/3)*x"] {
            let once = n(s);
            assert_eq!(once.normalize(), once, "{}", s);
        }
    }
}
