use exprpoly::{
    atom::Atom,
    poly::{groebner::GroebnerSettings, rational::RationalPolynomial},
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("EXPRPOLY_LOG"))
        .init();

    let settings = GroebnerSettings::default();

    let a = RationalPolynomial::from_expressions(
        &Atom::parse("(a+b)*(c+d)").unwrap(),
        &Atom::parse("(e+f)*(c+d)").unwrap(),
        &settings,
    )
    .unwrap();
    println!("{}", a);

    let b = RationalPolynomial::from_expressions(
        &Atom::parse("x^(3/2) - x^(1/2)").unwrap(),
        &Atom::parse("2*x - 2").unwrap(),
        &settings,
    )
    .unwrap();
    println!("{} = {}", b, b.to_expression());

    let c = a.add(&b, &settings).unwrap();
    println!("{}", c);
}
