//! Premise oracle: can a side condition be discharged, and by what?
//!
//! A premise is *forced* when it is either assigned on the boolean
//! trail or evaluates under the current model. The overflow query has a
//! second form that searches the trail for a usable literal when the
//! model cannot decide, returning the witness so the rule can record it
//! as an antecedent.

use crate::inequality::Inequality;
use num_bigint::BigUint;
use polsat_core::{LBool, Pdd, SignedConstraint, SolverState};

/// True if `c` is assigned true on the trail or evaluates true.
#[must_use]
pub fn is_forced_true(s: &SolverState, c: &SignedConstraint) -> bool {
    c.bvalue(s) == LBool::True || c.is_currently_true(s)
}

/// True if `c` is assigned false on the trail or evaluates false.
#[must_use]
pub fn is_forced_false(s: &SolverState, c: &SignedConstraint) -> bool {
    c.bvalue(s) == LBool::False || c.is_currently_false(s)
}

/// True if `p` evaluates to `k` (signed, wrapping) under the model.
#[must_use]
pub fn is_forced_eq(s: &SolverState, p: &Pdd, k: i64) -> bool {
    s.try_eval(p) == p.manager().from_signed(k).as_val()
}

/// If `p = k` is forced false, return that equality as a premise.
#[must_use]
pub fn is_forced_diseq(s: &SolverState, p: &Pdd, k: i64) -> Option<SignedConstraint> {
    let c = s.eq_val(p, k);
    is_forced_false(s, &c).then_some(c)
}

/// If `odd(p)` is forced true, return it as a premise.
#[must_use]
pub fn is_forced_odd(s: &SolverState, p: &Pdd) -> Option<SignedConstraint> {
    let c = s.odd(p);
    is_forced_true(s, &c).then_some(c)
}

/// True if the model values of `x` and `y` multiply without overflow.
#[must_use]
pub fn is_non_overflow_vals(s: &SolverState, x: &Pdd, y: &Pdd) -> bool {
    let bound = x.manager().two_to_n();
    match (s.try_eval(x), s.try_eval(y)) {
        (Some(xv), Some(yv)) => xv * yv < bound,
        _ => false,
    }
}

/// Find a witness for `x * y` not overflowing.
///
/// First tries the model; failing that, scans the trail for an
/// unresolved negated overflow literal over `{x, y}`. The returned
/// constraint is the premise to record in the lemma.
#[must_use]
pub fn is_non_overflow(s: &SolverState, x: &Pdd, y: &Pdd) -> Option<SignedConstraint> {
    if is_non_overflow_vals(s, x, y) {
        return Some(!s.umul_ovfl(x, y));
    }
    for si in s.search() {
        if !si.is_boolean() || si.is_resolved() {
            continue;
        }
        let Some(lit) = si.lit() else {
            continue;
        };
        let d = s.lit2cnstr(lit);
        if !d.is_umul_ovfl() || !d.is_negative() {
            continue;
        }
        let Some((p, q)) = d.as_umul_ovfl() else {
            continue;
        };
        if x != p && x != q {
            continue;
        }
        if y != p && y != q {
            continue;
        }
        return Some(d);
    }
    None
}

/// Scan the trail for unresolved `<=` literals, applying `f` to each
/// until it yields true.
pub fn find_trail_ule(s: &SolverState, mut f: impl FnMut(&Inequality) -> bool) -> bool {
    for si in s.search() {
        if !si.is_boolean() || si.is_resolved() {
            continue;
        }
        let Some(lit) = si.lit() else {
            continue;
        };
        let d = s.lit2cnstr(lit);
        if !d.is_ule() {
            continue;
        }
        let Some(i) = Inequality::from_ule(&d) else {
            continue;
        };
        if f(&i) {
            return true;
        }
    }
    false
}

/// Ceiling of `2^K / k`, used for bound propagation.
#[must_use]
pub fn ceil_bound(two_to_n: &BigUint, k: &BigUint) -> BigUint {
    (two_to_n + k - 1u32) / k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_by_model() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        s.assign_value(x, BigUint::from(3u32)).unwrap();
        let c = s.eq_val(&s.var(x), 3);
        assert!(is_forced_true(&s, &c));
        assert!(is_forced_false(&s, &!&c));
        assert!(is_forced_eq(&s, &s.var(x), 3));
        assert!(!is_forced_eq(&s, &s.var(x), 0));
        assert!(is_forced_diseq(&s, &s.var(x), 0).is_some());
        assert!(is_forced_diseq(&s, &s.var(x), 3).is_none());
        assert!(is_forced_odd(&s, &s.var(x)).is_some());
    }

    #[test]
    fn test_forced_by_trail() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        let c = s.ule(&s.var(x), &s.var(y));
        s.assign_constraint(&c, false);
        // No model values, so only the trail forces it.
        assert!(is_forced_true(&s, &c));
        assert!(is_forced_false(&s, &!&c));
    }

    #[test]
    fn test_non_overflow_semantic() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        s.assign_value(x, BigUint::from(3u32)).unwrap();
        s.assign_value(y, BigUint::from(5u32)).unwrap();
        let w = is_non_overflow(&s, &s.var(x), &s.var(y)).unwrap();
        assert_eq!(w, !s.umul_ovfl(&s.var(x), &s.var(y)));
    }

    #[test]
    fn test_non_overflow_from_trail() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        s.assign_value(x, BigUint::from(5u32)).unwrap();
        s.assign_value(y, BigUint::from(5u32)).unwrap();
        // 25 >= 16: the model overflows, no semantic witness.
        assert!(is_non_overflow(&s, &s.var(x), &s.var(y)).is_none());
        // A trail literal in either argument order is accepted.
        let no_ovfl = !s.umul_ovfl(&s.var(y), &s.var(x));
        s.assign_constraint(&no_ovfl, false);
        assert_eq!(is_non_overflow(&s, &s.var(x), &s.var(y)), Some(no_ovfl));
    }

    #[test]
    fn test_non_overflow_skips_resolved() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        s.assign_value(x, BigUint::from(5u32)).unwrap();
        s.assign_value(y, BigUint::from(5u32)).unwrap();
        let no_ovfl = !s.umul_ovfl(&s.var(x), &s.var(y));
        let lit = s.assign_constraint(&no_ovfl, false);
        s.resolve(lit);
        assert!(is_non_overflow(&s, &s.var(x), &s.var(y)).is_none());
    }

    #[test]
    fn test_ceil_bound() {
        let n = BigUint::from(16u32);
        assert_eq!(ceil_bound(&n, &BigUint::from(3u32)), BigUint::from(6u32));
        assert_eq!(ceil_bound(&n, &BigUint::from(4u32)), BigUint::from(4u32));
        assert_eq!(ceil_bound(&n, &BigUint::from(5u32)), BigUint::from(4u32));
    }
}
