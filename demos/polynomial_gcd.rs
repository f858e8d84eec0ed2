use exprpoly::{
    atom::Atom,
    poly::{
        gcd::{poly_gcd, poly_lcm},
        groebner::GroebnerSettings,
    },
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("EXPRPOLY_LOG"))
        .init();

    let a = Atom::parse("(1 + 3*x1 + 5*x2 + 7*x3)^2*(x1 - x3)")
        .unwrap()
        .to_polynomial()
        .unwrap();
    let b = Atom::parse("(1 + 3*x1 + 5*x2 + 7*x3)*(x2^2 + 2)")
        .unwrap()
        .to_polynomial()
        .unwrap();

    let settings = GroebnerSettings::default();
    println!("gcd = {}", poly_gcd(&a, &b, &settings).unwrap());
    println!("lcm = {}", poly_lcm(&a, &b, &settings).unwrap());
}
