//! The expression tree consumed and produced by the polynomial engine.

use std::cmp::Ordering;

use crate::coefficient::Coefficient;
use crate::state::{State, Symbol};

/// An operator of an [`Atom::Op`] node.
///
/// The variant order is part of the default order on atoms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Pow,
    Subscript,
    Prime,
}

impl Operator {
    /// The number of operands the operator requires. `None` means at least two.
    #[inline]
    pub fn get_arity(&self) -> Option<usize> {
        match self {
            Operator::Add | Operator::Mul => None,
            Operator::Sub | Operator::Div | Operator::Pow | Operator::Subscript => Some(2),
            Operator::Neg | Operator::Prime => Some(1),
        }
    }

    #[inline]
    pub fn get_precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 7,
            Operator::Mul | Operator::Div => 8,
            Operator::Neg => 10,
            Operator::Pow => 11,
            Operator::Subscript | Operator::Prime => 12,
        }
    }

    /// Check that `n` operands are valid for this operator.
    #[inline]
    pub fn accepts(&self, n: usize) -> bool {
        match self.get_arity() {
            Some(a) => a == n,
            None => n >= 2,
        }
    }
}

/// A mathematical expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Num(Coefficient),
    Var(Symbol),
    /// A function call `f(args)`. Function calls are never decomposed by the polynomial engine.
    Fun(Symbol, Vec<Atom>),
    Op(Operator, Vec<Atom>),
}

impl Default for Atom {
    fn default() -> Self {
        Atom::Num(Coefficient::zero())
    }
}

impl From<Coefficient> for Atom {
    fn from(c: Coefficient) -> Self {
        Atom::Num(c)
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Atom::Num(n.into())
    }
}

impl From<Symbol> for Atom {
    fn from(s: Symbol) -> Self {
        Atom::Var(s)
    }
}

impl Atom {
    /// Parse an expression from a string.
    pub fn parse(input: &str) -> Result<Atom, String> {
        crate::parser::parse(input)
    }

    pub fn new_num<T: Into<Coefficient>>(n: T) -> Atom {
        Atom::Num(n.into())
    }

    pub fn new_var(name: &str) -> Atom {
        Atom::Var(State::get_symbol(name))
    }

    pub fn new_fun(name: &str, args: Vec<Atom>) -> Atom {
        Atom::Fun(State::get_symbol(name), args)
    }

    pub fn add(args: Vec<Atom>) -> Atom {
        Atom::Op(Operator::Add, args)
    }

    pub fn mul(args: Vec<Atom>) -> Atom {
        Atom::Op(Operator::Mul, args)
    }

    pub fn sub(a: Atom, b: Atom) -> Atom {
        Atom::Op(Operator::Sub, vec![a, b])
    }

    pub fn div(a: Atom, b: Atom) -> Atom {
        Atom::Op(Operator::Div, vec![a, b])
    }

    pub fn neg(a: Atom) -> Atom {
        Atom::Op(Operator::Neg, vec![a])
    }

    pub fn pow(base: Atom, exp: Atom) -> Atom {
        Atom::Op(Operator::Pow, vec![base, exp])
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_zero())
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_one())
    }

    /// Find an operator anywhere in the expression, including inside function
    /// arguments, that has the wrong number of operands.
    pub fn find_malformed(&self) -> Option<(Operator, usize)> {
        match self {
            Atom::Num(_) | Atom::Var(_) => None,
            Atom::Fun(_, args) => args.iter().find_map(|a| a.find_malformed()),
            Atom::Op(op, args) => {
                if !op.accepts(args.len()) {
                    Some((*op, args.len()))
                } else {
                    args.iter().find_map(|a| a.find_malformed())
                }
            }
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Atom::Num(_) => 0,
            Atom::Var(_) => 1,
            Atom::Fun(_, _) => 2,
            Atom::Op(_, _) => 3,
        }
    }
}

fn cmp_args(a: &[Atom], b: &[Atom]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => {}
            o => return o,
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_symbols(a: Symbol, b: Symbol) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        State::get_name(a).cmp(&State::get_name(b))
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The default order: numbers first (by value), then variables by name, then
/// function calls by name and arguments, and finally operator nodes. This order
/// ranks polynomial variables: a variable that is smaller is more significant.
impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Atom::Num(n1), Atom::Num(n2)) => n1.cmp(n2),
            (Atom::Var(v1), Atom::Var(v2)) => cmp_symbols(*v1, *v2),
            (Atom::Fun(f1, a1), Atom::Fun(f2, a2)) => {
                cmp_symbols(*f1, *f2).then_with(|| cmp_args(a1, a2))
            }
            (Atom::Op(o1, a1), Atom::Op(o2, a2)) => o1.cmp(o2).then_with(|| cmp_args(a1, a2)),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}
