use exprpoly::{
    atom::Atom,
    poly::{
        groebner::{GroebnerBasis, GroebnerSettings, LowestLeadingMonomial},
        polynomial::MultivariatePolynomial,
    },
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("EXPRPOLY_LOG"))
        .init();

    // cyclic-4
    let polys = [
        "a*b*c*d - 1",
        "a*b*c + a*b*d + a*c*d + b*c*d",
        "a*b + b*c + a*d + c*d",
        "a + b + c + d",
    ];

    let fs: Vec<MultivariatePolynomial> = polys
        .iter()
        .map(|x| Atom::parse(x).unwrap().to_polynomial().unwrap())
        .collect();

    let gb = GroebnerBasis::<LowestLeadingMonomial>::new(&fs, &GroebnerSettings::default()).unwrap();

    println!("Basis:");
    for g in &gb.system {
        println!("\t{}", g);
    }
    println!("{:?}", gb.stats);
}
