//! Property-based tests for polynomial arithmetic, division and gcds.

use proptest::prelude::*;

use exprpoly::{
    atom::Atom,
    coefficient::Coefficient,
    poly::{
        gcd::poly_gcd,
        groebner::{poly_div, quotients, GroebnerSettings},
        polynomial::MultivariatePolynomial,
    },
};

fn base() -> MultivariatePolynomial {
    Atom::parse("x + y + z").unwrap().to_polynomial().unwrap()
}

// Strategy for small polynomials in x, y and z with up to 4 terms of degree <= 2 per variable
fn small_poly() -> impl Strategy<Value = MultivariatePolynomial> {
    proptest::collection::vec((-9i64..10, 0u32..3, 0u32..3, 0u32..3), 0..5).prop_map(|terms| {
        let mut p = base().zero();
        for (c, a, b, d) in terms {
            p.append_monomial(Coefficient::from(c), &[a, b, d]);
        }
        p
    })
}

fn nonzero_poly() -> impl Strategy<Value = MultivariatePolynomial> {
    small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
}

// Strategy for non-zero polynomials in x and y that are at most linear in each variable
fn tiny_poly() -> impl Strategy<Value = MultivariatePolynomial> {
    proptest::collection::vec((-5i64..6, 0u32..2, 0u32..2), 1..4)
        .prop_map(|terms| {
            let mut p = base().zero();
            for (c, a, b) in terms {
                p.append_monomial(Coefficient::from(c), &[a, b, 0]);
            }
            p
        })
        .prop_filter("polynomial must be non-zero", |p| !p.is_zero())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_commutative(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!((&a + &b) + c.clone(), a.clone() + (&b + &c));
    }

    #[test]
    fn mul_identity_and_inverse(a in small_poly()) {
        prop_assert_eq!(&a * &a.one(), a.clone());
        prop_assert!((a.clone() + (-a.clone())).is_zero());
    }

    #[test]
    fn distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!(&a * &(&b + &c), &a * &b + &a * &c);
    }

    #[test]
    fn canonical_form(a in small_poly(), b in small_poly()) {
        let c = &a * &b + a.clone();
        c.check_consistency();
    }

    #[test]
    fn division_identity(f in small_poly(), d1 in nonzero_poly(), d2 in nonzero_poly()) {
        let divisors = vec![d1, d2];
        let (qs, r) = quotients(&f, &divisors);

        let mut sum = r.clone();
        for (q, d) in qs.iter().zip(&divisors) {
            sum = sum + q * d;
        }
        prop_assert_eq!(sum, f);

        // the remainder is fully reduced
        let (steps, r2) = poly_div(&r, &divisors);
        prop_assert!(steps.is_empty());
        prop_assert_eq!(r2, r);
    }

    #[test]
    fn round_trip(a in small_poly()) {
        let e = a.to_expression();
        prop_assert_eq!(e.to_polynomial().unwrap(), a);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn gcd_of_multiples(a in tiny_poly(), b in tiny_poly(), c in tiny_poly()) {
        let settings = GroebnerSettings::default().unbounded();
        let g = poly_gcd(&(&a * &c), &(&b * &c), &settings).unwrap();

        // c divides the gcd
        prop_assert!(poly_div(&g, &[c.clone()]).1.is_zero());
        prop_assert_eq!(g.lcoeff(), Coefficient::one());
    }
}
