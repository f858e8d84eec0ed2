use std::fmt::{self, Write};

use crate::atom::{Atom, Operator};

/// The binding strength of an atom when it appears as an operand.
fn precedence(a: &Atom) -> u8 {
    match a {
        Atom::Num(n) => {
            if n.is_negative() {
                Operator::Neg.get_precedence()
            } else if n.is_integer() {
                u8::MAX
            } else {
                Operator::Div.get_precedence()
            }
        }
        Atom::Var(_) | Atom::Fun(_, _) => u8::MAX,
        Atom::Op(o, _) => o.get_precedence(),
    }
}

fn fmt_operand(a: &Atom, min_precedence: u8, f: &mut fmt::Formatter) -> fmt::Result {
    if precedence(a) < min_precedence {
        f.write_char('(')?;
        a.fmt_output(f)?;
        f.write_char(')')
    } else {
        a.fmt_output(f)
    }
}

impl Atom {
    fn fmt_output(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Atom::Num(n) => write!(f, "{}", n),
            Atom::Var(v) => write!(f, "{}", v),
            Atom::Fun(name, args) => {
                write!(f, "{}(", name)?;
                let mut first = true;
                for a in args {
                    if !first {
                        f.write_char(',')?;
                    }
                    first = false;
                    a.fmt_output(f)?;
                }
                f.write_char(')')
            }
            // the operands cannot be placed around the operator
            Atom::Op(op, args) if !op.accepts(args.len()) => write!(f, "{:?}", self),
            Atom::Op(op, args) => match op {
                Operator::Add => {
                    let mut first = true;
                    for a in args {
                        let starts_with_minus = match a {
                            Atom::Num(n) => n.is_negative(),
                            Atom::Op(Operator::Neg, n) => n.len() == 1,
                            Atom::Op(Operator::Mul, m) => {
                                matches!(m.first(), Some(Atom::Num(n)) if n.is_negative())
                            }
                            _ => false,
                        };

                        if !first && !starts_with_minus {
                            f.write_char('+')?;
                        }
                        first = false;

                        // a sum inside a sum was not flattened, so keep its grouping
                        fmt_operand(a, Operator::Add.get_precedence() + 1, f)?;
                    }
                    Ok(())
                }
                Operator::Sub => {
                    fmt_operand(&args[0], Operator::Sub.get_precedence(), f)?;
                    f.write_char('-')?;
                    fmt_operand(&args[1], Operator::Sub.get_precedence() + 1, f)
                }
                Operator::Mul => {
                    let mut first = true;
                    for a in args {
                        if !first {
                            f.write_char('*')?;
                        }

                        // only the first factor may carry a bare sign
                        let p = if first {
                            Operator::Neg.get_precedence()
                        } else {
                            Operator::Mul.get_precedence() + 1
                        };
                        first = false;
                        fmt_operand(a, p, f)?;
                    }
                    Ok(())
                }
                Operator::Div => {
                    fmt_operand(&args[0], Operator::Div.get_precedence(), f)?;
                    f.write_char('/')?;
                    fmt_operand(&args[1], Operator::Div.get_precedence() + 1, f)
                }
                Operator::Neg => {
                    f.write_char('-')?;
                    fmt_operand(&args[0], Operator::Mul.get_precedence() + 1, f)
                }
                Operator::Pow => {
                    fmt_operand(&args[0], Operator::Pow.get_precedence() + 1, f)?;
                    f.write_char('^')?;
                    fmt_operand(&args[1], Operator::Pow.get_precedence() + 1, f)
                }
                Operator::Subscript => {
                    fmt_operand(&args[0], Operator::Subscript.get_precedence(), f)?;
                    f.write_char('_')?;
                    fmt_operand(&args[1], u8::MAX, f)
                }
                Operator::Prime => {
                    fmt_operand(&args[0], Operator::Prime.get_precedence(), f)?;
                    f.write_char('\'')
                }
            },
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_output(f)
    }
}

#[cfg(test)]
mod test {
    use crate::atom::{Atom, Operator};

    #[test]
    fn print() {
        let cases = [
            ("x+2*y-3", "x+2*y-3"),
            ("(a+b)*(c+d)", "(a+b)*(c+d)"),
            ("-x^2", "-x^2"),
            ("(-x)^2", "(-x)^2"),
            ("x^(1/2)", "x^(1/2)"),
            ("f(x,y+1)/(z*w)", "f(x,y+1)/(z*w)"),
            ("x_1'", "x_1'"),
        ];

        for (input, output) in cases {
            assert_eq!(Atom::parse(input).unwrap().to_string(), output);
        }
    }

    #[test]
    fn reparse() {
        for input in ["a-(b-c)", "x^2^3", "2^-1*x", "-(a+b)*c", "a/(b/c)"] {
            let a = Atom::parse(input).unwrap();
            let b = Atom::parse(&a.to_string()).unwrap();
            assert_eq!(a, b, "{} printed as {}", input, a);
        }
    }

    #[test]
    fn wrong_arity() {
        let a = Atom::add(vec![Atom::new_var("x"), Atom::Op(Operator::Neg, vec![])]);
        let s = a.to_string();
        assert!(s.starts_with("x+"));
        assert!(s.contains("Neg"));

        let b = Atom::Op(Operator::Pow, vec![Atom::new_num(2)]);
        assert!(b.to_string().contains("Pow"));
    }
}
