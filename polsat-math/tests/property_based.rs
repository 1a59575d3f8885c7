//! Property-based tests for modular polynomial arithmetic.

use num_bigint::BigUint;
use polsat_math::{Assignment, Pdd, PddManager};
use proptest::prelude::*;

/// Strategy for small signed coefficients.
fn coeff_strategy() -> impl Strategy<Value = i64> {
    -16i64..16i64
}

/// Strategy for concrete 4-bit values.
fn value_strategy() -> impl Strategy<Value = u32> {
    0u32..16u32
}

/// Build `c2*x*y + c1*x + c0` over variables 0 and 1.
fn poly(m: &PddManager, c2: i64, c1: i64, c0: i64) -> Pdd {
    m.from_signed(c2) * m.var(0) * m.var(1) + m.from_signed(c1) * m.var(0) + m.from_signed(c0)
}

fn assignment(x: u32, y: u32) -> Assignment {
    let mut a = Assignment::default();
    a.insert(0, BigUint::from(x));
    a.insert(1, BigUint::from(y));
    a
}

proptest! {
    /// Addition is commutative.
    #[test]
    fn add_commutative(
        a in coeff_strategy(), b in coeff_strategy(), c in coeff_strategy(),
        d in coeff_strategy(), e in coeff_strategy(), f in coeff_strategy()
    ) {
        let m = PddManager::new(4);
        let p = poly(&m, a, b, c);
        let q = poly(&m, d, e, f);
        prop_assert_eq!(&p + &q, &q + &p);
    }

    /// Multiplication distributes over addition.
    #[test]
    fn mul_distributes(
        a in coeff_strategy(), b in coeff_strategy(), c in coeff_strategy(),
        d in coeff_strategy(), e in coeff_strategy(), f in coeff_strategy()
    ) {
        let m = PddManager::new(4);
        let p = poly(&m, a, b, c);
        let q = poly(&m, d, e, f);
        let r = m.from_signed(a) * m.var(1) + m.from_signed(f);
        let lhs = &r * &(&p + &q);
        let rhs = &(&r * &p) + &(&r * &q);
        prop_assert_eq!(lhs, rhs);
    }

    /// Subtracting a polynomial from itself gives zero.
    #[test]
    fn sub_self_is_zero(a in coeff_strategy(), b in coeff_strategy(), c in coeff_strategy()) {
        let m = PddManager::new(4);
        let p = poly(&m, a, b, c);
        prop_assert!((&p - &p).is_zero());
    }

    /// Evaluation is a ring homomorphism into Z/2^K.
    #[test]
    fn eval_homomorphism(
        a in coeff_strategy(), b in coeff_strategy(), c in coeff_strategy(),
        d in coeff_strategy(), e in coeff_strategy(), f in coeff_strategy(),
        x in value_strategy(), y in value_strategy()
    ) {
        let m = PddManager::new(4);
        let p = poly(&m, a, b, c);
        let q = poly(&m, d, e, f);
        let assign = assignment(x, y);
        let pv = p.try_eval(&assign).unwrap();
        let qv = q.try_eval(&assign).unwrap();
        let modulus = m.two_to_n();
        prop_assert_eq!((&p + &q).try_eval(&assign).unwrap(), (&pv + &qv) % &modulus);
        prop_assert_eq!((&p * &q).try_eval(&assign).unwrap(), (&pv * &qv) % &modulus);
        prop_assert_eq!((-&p).try_eval(&assign).unwrap(), (&modulus - &pv) % &modulus);
    }

    /// Linear factorisation reconstructs the polynomial.
    #[test]
    fn factor_reconstructs(
        a in coeff_strategy(), b in coeff_strategy(), c in coeff_strategy(),
        d in coeff_strategy()
    ) {
        let m = PddManager::new(4);
        let p = poly(&m, a, b, c) + m.from_signed(d) * m.var(1);
        for v in 0..2u32 {
            let (hi, lo) = p.factor(v, 1);
            prop_assert_eq!(hi * m.var(v) + lo, p.clone());
        }
    }

    /// Exact division by a constant round-trips.
    #[test]
    fn try_div_roundtrip(a in coeff_strategy(), b in coeff_strategy(), k in 1i64..8i64) {
        let m = PddManager::new(4);
        let p = m.from_signed(a * k) * m.var(0) + m.from_signed(b * k);
        let kc = m.from_signed(k);
        if let Some(kv) = kc.as_val() {
            if let Some(q) = p.try_div(&kv) {
                prop_assert_eq!(q * kc, p);
            }
        }
    }

    /// Degree is bounded by construction and factor splits degrees.
    #[test]
    fn degree_after_mul(a in 1i64..8i64, b in 1i64..8i64) {
        let m = PddManager::new(4);
        let p = m.from_signed(a) * m.var(0);
        let q = m.from_signed(b) * m.var(0) * m.var(1);
        let prod = &p * &q;
        if !prod.is_zero() {
            prop_assert_eq!(prod.degree(0), 2);
            prop_assert_eq!(prod.degree(1), 1);
        }
    }
}
