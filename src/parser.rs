//! A parser for infix expressions, with implicit multiplication, function calls,
//! powers, subscripts (`x_1`) and primes (`f'`).

use smartstring::{LazyCompact, SmartString};

use crate::{
    atom::{Atom, Operator},
    coefficient::Coefficient,
    state::State,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    pub line_number: usize,
    pub char_pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(SmartString<LazyCompact>),
    ID(SmartString<LazyCompact>),
    Op(char),
    OpenParenthesis,
    CloseParenthesis,
    Comma,
    EOF,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => f.write_str(n),
            Token::ID(v) => f.write_str(v),
            Token::Op(c) => f.write_fmt(format_args!("{}", c)),
            Token::OpenParenthesis => f.write_str("("),
            Token::CloseParenthesis => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::EOF => f.write_str("end of input"),
        }
    }
}

impl Token {
    /// Returns `true` if the token can start an operand, which means that
    /// it is implicitly multiplied with a preceding operand.
    #[inline]
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::ID(_) | Token::OpenParenthesis
        )
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, Position)>, String> {
    let ops = ['^', '+', '*', '-', '/', '_', '\''];
    let whitespace = [' ', '\t', '\n', '\r'];

    let mut tokens = vec![];
    let mut chars = input.chars().peekable();
    let mut pos = Position {
        line_number: 1,
        char_pos: 1,
    };

    while let Some(&c) = chars.peek() {
        let start = pos;

        if whitespace.contains(&c) {
            chars.next();
            if c == '\n' {
                pos.line_number += 1;
                pos.char_pos = 1;
            } else {
                pos.char_pos += 1;
            }
            continue;
        }

        if c.is_ascii_digit() {
            let mut id_buffer = SmartString::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                id_buffer.push(d);
                chars.next();
                pos.char_pos += 1;
            }
            tokens.push((Token::Number(id_buffer), start));
            continue;
        }

        if c.is_alphabetic() {
            let mut id_buffer = SmartString::new();
            while let Some(&d) = chars.peek() {
                if !d.is_alphanumeric() {
                    break;
                }
                id_buffer.push(d);
                chars.next();
                pos.char_pos += 1;
            }
            tokens.push((Token::ID(id_buffer), start));
            continue;
        }

        let token = match c {
            '(' => Token::OpenParenthesis,
            ')' => Token::CloseParenthesis,
            ',' => Token::Comma,
            x if ops.contains(&x) => Token::Op(x),
            _ => Err(format!(
                "Unexpected '{}' in input at line {} and column {}",
                c, pos.line_number, pos.char_pos
            ))?,
        };

        chars.next();
        pos.char_pos += 1;
        tokens.push((token, start));
    }

    tokens.push((Token::EOF, pos));
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, Position)>,
    index: usize,
}

impl Parser {
    #[inline]
    fn peek(&self) -> &Token {
        &self.tokens[self.index].0
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.index].0.clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        t
    }

    fn error(&self, msg: &str) -> String {
        let p = &self.tokens[self.index].1;
        format!(
            "Error at line {} and position {}: {}",
            p.line_number, p.char_pos, msg
        )
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        if *self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}', but found '{}'", token, self.peek())))
        }
    }

    fn parse_sum(&mut self) -> Result<Atom, String> {
        let mut terms = vec![self.parse_product()?];

        loop {
            match self.peek() {
                Token::Op('+') => {
                    self.advance();
                    terms.push(self.parse_product()?);
                }
                Token::Op('-') => {
                    self.advance();
                    let t = self.parse_product()?;
                    terms.push(negate(t));
                }
                _ => break,
            }
        }

        if terms.len() == 1 {
            Ok(terms.pop().unwrap_or_default())
        } else {
            Ok(Atom::Op(Operator::Add, terms))
        }
    }

    fn parse_product(&mut self) -> Result<Atom, String> {
        let mut acc = self.parse_unary()?;

        loop {
            match self.peek() {
                Token::Op('*') => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    acc = multiply(acc, rhs);
                }
                Token::Op('/') => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    acc = Atom::Op(Operator::Div, vec![acc, rhs]);
                }
                t if t.starts_operand() => {
                    // implicit multiplication: 2x, (a+b)(c+d), a b
                    let rhs = self.parse_unary()?;
                    acc = multiply(acc, rhs);
                }
                _ => break,
            }
        }

        Ok(acc)
    }

    fn parse_unary(&mut self) -> Result<Atom, String> {
        match self.peek() {
            Token::Op('-') => {
                self.advance();
                let a = self.parse_unary()?;
                Ok(negate(a))
            }
            Token::Op('+') => {
                // unary + operator, can be ignored as plus is the default
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Atom, String> {
        let base = self.parse_postfix()?;

        if *self.peek() == Token::Op('^') {
            self.advance();
            // right associative, and the exponent may carry a sign
            let exp = self.parse_unary()?;
            Ok(Atom::Op(Operator::Pow, vec![base, exp]))
        } else {
            Ok(base)
        }
    }

    fn parse_postfix(&mut self) -> Result<Atom, String> {
        let mut a = self.parse_primary()?;

        loop {
            match self.peek() {
                Token::Op('\'') => {
                    self.advance();
                    a = Atom::Op(Operator::Prime, vec![a]);
                }
                Token::Op('_') => {
                    self.advance();
                    let sub = self.parse_primary()?;
                    a = Atom::Op(Operator::Subscript, vec![a, sub]);
                }
                _ => break,
            }
        }

        Ok(a)
    }

    fn parse_primary(&mut self) -> Result<Atom, String> {
        match self.advance() {
            Token::Number(n) => Ok(Atom::Num(
                Coefficient::parse_integer(&n).map_err(|e| self.error(&e))?,
            )),
            Token::ID(name) => {
                if *self.peek() == Token::OpenParenthesis {
                    self.advance();
                    let mut args = vec![];
                    if *self.peek() != Token::CloseParenthesis {
                        args.push(self.parse_sum()?);
                        while *self.peek() == Token::Comma {
                            self.advance();
                            args.push(self.parse_sum()?);
                        }
                    }
                    self.expect(Token::CloseParenthesis).map_err(|_| {
                        self.error(&format!(
                            "missing closing parenthesis for function '{}'",
                            name
                        ))
                    })?;
                    Ok(Atom::Fun(State::get_symbol(name.as_str()), args))
                } else {
                    Ok(Atom::Var(State::get_symbol(name.as_str())))
                }
            }
            Token::OpenParenthesis => {
                let a = self.parse_sum()?;
                self.expect(Token::CloseParenthesis)
                    .map_err(|_| self.error("open parenthesis is not closed"))?;
                Ok(a)
            }
            Token::EOF => Err(self.error("unexpected end of input")),
            t => Err(self.error(&format!("unexpected '{}'", t))),
        }
    }
}

/// Negate a parsed operand, folding the sign into numbers.
fn negate(a: Atom) -> Atom {
    match a {
        Atom::Num(n) => Atom::Num(n.neg()),
        Atom::Op(Operator::Neg, mut args) if args.len() == 1 => args.pop().unwrap_or_default(),
        a => Atom::Op(Operator::Neg, vec![a]),
    }
}

/// Multiply two parsed operands, flattening a product on the left.
fn multiply(acc: Atom, rhs: Atom) -> Atom {
    match acc {
        Atom::Op(Operator::Mul, mut args) => {
            args.push(rhs);
            Atom::Op(Operator::Mul, args)
        }
        acc => Atom::Op(Operator::Mul, vec![acc, rhs]),
    }
}

/// Parse an expression.
pub fn parse(input: &str) -> Result<Atom, String> {
    let tokens = tokenize(input)?;
    if tokens.len() == 1 {
        return Err("Expression is empty".to_string());
    }

    let mut parser = Parser { tokens, index: 0 };
    let a = parser.parse_sum()?;

    if *parser.peek() != Token::EOF {
        return Err(parser.error(&format!("unexpected '{}'", parser.peek())));
    }

    Ok(a)
}

#[cfg(test)]
mod test {
    use crate::{
        atom::{Atom, Operator},
        state::State,
    };

    #[test]
    fn implicit_multiplication() {
        let a = Atom::parse("3y").unwrap();
        assert_eq!(a, Atom::mul(vec![Atom::new_num(3), Atom::new_var("y")]));

        let b = Atom::parse("(a+b)(c+d)").unwrap();
        assert!(matches!(b, Atom::Op(Operator::Mul, ref args) if args.len() == 2));
    }

    #[test]
    fn subtraction_and_negation() {
        let a = Atom::parse("x - 2").unwrap();
        assert_eq!(a, Atom::add(vec![Atom::new_var("x"), Atom::new_num(-2)]));

        let b = Atom::parse("-x^2").unwrap();
        assert_eq!(
            b,
            Atom::neg(Atom::pow(Atom::new_var("x"), Atom::new_num(2)))
        );
    }

    #[test]
    fn powers_are_right_associative() {
        let a = Atom::parse("x^2^3").unwrap();
        assert_eq!(
            a,
            Atom::pow(
                Atom::new_var("x"),
                Atom::pow(Atom::new_num(2), Atom::new_num(3))
            )
        );

        let b = Atom::parse("x^-1").unwrap();
        assert_eq!(b, Atom::pow(Atom::new_var("x"), Atom::new_num(-1)));
    }

    #[test]
    fn functions_subscripts_primes() {
        let a = Atom::parse("f(x, y+1)").unwrap();
        assert!(matches!(a, Atom::Fun(f, ref args) if f == State::get_symbol("f") && args.len() == 2));

        let b = Atom::parse("x_1 + g'").unwrap();
        assert_eq!(
            b,
            Atom::add(vec![
                Atom::Op(Operator::Subscript, vec![Atom::new_var("x"), Atom::new_num(1)]),
                Atom::Op(Operator::Prime, vec![Atom::new_var("g")]),
            ])
        );
    }

    #[test]
    fn division_is_left_associative() {
        let a = Atom::parse("a/b/c").unwrap();
        assert_eq!(
            a,
            Atom::div(
                Atom::div(Atom::new_var("a"), Atom::new_var("b")),
                Atom::new_var("c")
            )
        );
    }

    #[test]
    fn errors() {
        assert!(Atom::parse("").is_err());
        assert!(Atom::parse("(x + 1").is_err());
        assert!(Atom::parse("x + ").is_err());
        assert!(Atom::parse("x ; y").is_err());
        assert!(Atom::parse("f(x").is_err());
    }
}
