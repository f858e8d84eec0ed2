//! Exprpoly is a multivariate polynomial engine for mathematical expressions.
//!
//! Expressions are converted to a canonical sparse polynomial with exact rational
//! coefficients. On top of that it implements multivariate division, Buchberger's
//! algorithm for reduced Groebner bases, polynomial gcd and lcm, and the
//! reduction of rational expressions to lowest terms.
//!
//! For example:
//!
//! ```
//! use exprpoly::{atom::Atom, poly::groebner::GroebnerSettings, poly::rational::reduce_rational_expression};
//!
//! fn main() {
//!     let num = Atom::parse("(a+b)*(c+d)").unwrap();
//!     let den = Atom::parse("(e+f)*(c+d)").unwrap();
//!     let (n, d) = reduce_rational_expression(&num, &den, &GroebnerSettings::default()).unwrap();
//!     println!("({})/({})", n, d);
//! }
//! ```

pub mod atom;
pub mod coefficient;
pub mod evaluate;
pub mod normalize;
pub mod parser;
pub mod poly;
pub mod printer;
pub mod state;
mod utils;

pub use poly::gcd::{poly_gcd, poly_lcm};
pub use poly::groebner::{poly_div, reduce, reduced_grobner, GroebnerSettings};
pub use poly::polynomial::MultivariatePolynomial;
pub use poly::rational::{reduce_rational_expression, RationalPolynomial};
pub use poly::{PolyError, Variable};
