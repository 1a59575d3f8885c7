//! Shape matchers over inequalities in a distinguished variable.
//!
//! Each matcher recognises a polynomial shape and returns the bound
//! free polynomials; each has a `verify_*` counterpart that checks a
//! binding against the inequality it came from. The matchers are
//! purely syntactic except where noted (`match_axb_eq_0` consults the
//! model for the right-hand side).

use crate::inequality::Inequality;
use polsat_core::{PVar, Pdd, SolverState};

/// Match `[v] .. <= v`.
#[must_use]
pub fn is_l_v(s: &SolverState, v: PVar, i: &Inequality) -> bool {
    *i.rhs() == s.var(v)
}

/// Match `[v] v <= ..`.
#[must_use]
pub fn is_g_v(s: &SolverState, v: PVar, i: &Inequality) -> bool {
    *i.lhs() == s.var(v)
}

/// Match `p = x * Y`, returning `Y`.
#[must_use]
pub fn match_xy(x: PVar, p: &Pdd) -> Option<Pdd> {
    if p.degree(x) != 1 {
        return None;
    }
    p.factor_exact(x, 1)
}

/// Match `p = coeff * x * Y` where `x` is a unary polynomial
/// `coeff * var`, returning `Y`.
#[must_use]
pub fn match_coeff_xy(x: &Pdd, p: &Pdd) -> Option<Pdd> {
    let (coeff, var) = x.as_unary()?;
    let xy = p.try_div(&coeff)?;
    xy.factor_exact(var, 1)
}

/// Match `[x] x <= Y`, returning `Y`.
#[must_use]
pub fn match_x_l_y(s: &SolverState, x: PVar, i: &Inequality) -> Option<Pdd> {
    is_g_v(s, x, i).then(|| i.rhs().clone())
}

/// Verify a [`match_x_l_y`] binding.
#[must_use]
pub fn verify_x_l_y(s: &SolverState, x: PVar, i: &Inequality, y: &Pdd) -> bool {
    *i.lhs() == s.var(x) && i.rhs() == y
}

/// Match `[x] Y <= a*x`, returning `(a, Y)`.
#[must_use]
pub fn match_y_l_ax(x: PVar, i: &Inequality) -> Option<(Pdd, Pdd)> {
    let a = match_xy(x, i.rhs())?;
    Some((a, i.lhs().clone()))
}

/// Verify a [`match_y_l_ax`] binding.
#[must_use]
pub fn verify_y_l_ax(s: &SolverState, x: PVar, i: &Inequality, a: &Pdd, y: &Pdd) -> bool {
    i.lhs() == y && *i.rhs() == a * &s.var(x)
}

/// Match `[x] a*x <= Y`, returning `(a, Y)`.
#[must_use]
pub fn match_ax_l_y(x: PVar, i: &Inequality) -> Option<(Pdd, Pdd)> {
    let a = match_xy(x, i.lhs())?;
    Some((a, i.rhs().clone()))
}

/// Verify a [`match_ax_l_y`] binding.
#[must_use]
pub fn verify_ax_l_y(s: &SolverState, x: PVar, i: &Inequality, a: &Pdd, y: &Pdd) -> bool {
    i.rhs() == y && *i.lhs() == a * &s.var(x)
}

/// Match `[x] a*x + b <= Y`, returning `(a, b, Y)`.
#[must_use]
pub fn match_axb_l_y(x: PVar, i: &Inequality) -> Option<(Pdd, Pdd, Pdd)> {
    if i.lhs().degree(x) != 1 {
        return None;
    }
    let (a, b) = i.lhs().factor(x, 1);
    Some((a, b, i.rhs().clone()))
}

/// Verify a [`match_axb_l_y`] binding.
#[must_use]
pub fn verify_axb_l_y(
    s: &SolverState,
    x: PVar,
    i: &Inequality,
    a: &Pdd,
    b: &Pdd,
    y: &Pdd,
) -> bool {
    i.rhs() == y && *i.lhs() == a * &s.var(x) + b.clone()
}

/// Match `[x] a*x + b <= Y` with `Y` evaluating to 0, so the inequality
/// is used as the equation `a*x + b = 0`. Returns `(a, b, Y)`.
#[must_use]
pub fn match_axb_eq_0(s: &SolverState, x: PVar, i: &Inequality) -> Option<(Pdd, Pdd, Pdd)> {
    let y_val = s.try_eval(i.rhs())?;
    if !num_traits::Zero::is_zero(&y_val) {
        return None;
    }
    match_axb_l_y(x, i)
}

/// Verify a [`match_axb_eq_0`] binding.
#[must_use]
pub fn verify_axb_eq_0(
    s: &SolverState,
    x: PVar,
    i: &Inequality,
    a: &Pdd,
    b: &Pdd,
    y: &Pdd,
) -> bool {
    y.is_val()
        && y.is_zero()
        && i.rhs() == y
        && *i.lhs() == a * &s.var(x) + b.clone()
}

/// Match `[x] x*Y <= x*Z`, returning `(Y, Z)`.
#[must_use]
pub fn match_xy_l_xz(x: PVar, i: &Inequality) -> Option<(Pdd, Pdd)> {
    let y = match_xy(x, i.lhs())?;
    let z = match_xy(x, i.rhs())?;
    Some((y, z))
}

/// Match `[v] v*x <= z*x` with `x` a unary polynomial, returning
/// `(x, z)`.
#[must_use]
pub fn match_vx_l_zx(v: PVar, i: &Inequality) -> Option<(Pdd, Pdd)> {
    let x = match_xy(v, i.lhs())?;
    let z = match_coeff_xy(&x, i.rhs())?;
    Some((x, z))
}

/// Verify a [`match_vx_l_zx`] binding.
#[must_use]
pub fn verify_vx_l_zx(s: &SolverState, v: PVar, i: &Inequality, x: &Pdd, z: &Pdd) -> bool {
    *i.lhs() == s.var(v) * x.clone() && *i.rhs() == z * x
}

/// Match `[v] y*x <= v*x` with `x` a unary polynomial, returning
/// `(x, y)`.
#[must_use]
pub fn match_yx_l_vx(v: PVar, i: &Inequality) -> Option<(Pdd, Pdd)> {
    let x = match_xy(v, i.rhs())?;
    let y = match_coeff_xy(&x, i.lhs())?;
    Some((x, y))
}

/// Verify a [`match_yx_l_vx`] binding.
#[must_use]
pub fn verify_yx_l_vx(s: &SolverState, v: PVar, i: &Inequality, x: &Pdd, y: &Pdd) -> bool {
    *i.lhs() == y * x && *i.rhs() == s.var(v) * x.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn state() -> (SolverState, PVar, PVar, PVar) {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        let z = s.add_var(4);
        (s, x, y, z)
    }

    #[test]
    fn test_match_xy() {
        let (s, x, y, _) = state();
        let p = s.var(y) * s.var(x);
        assert_eq!(match_xy(x, &p), Some(s.var(y)));
        // additive part blocks the exact factorisation
        let q = s.var(y) * s.var(x) + s.var2pdd(x).one();
        assert!(match_xy(x, &q).is_none());
        // quadratic occurrence blocks it too
        let r = s.var(x) * s.var(x);
        assert!(match_xy(x, &r).is_none());
    }

    #[test]
    fn test_match_coeff_xy() {
        let (s, x, y, _) = state();
        let m = s.var2pdd(x);
        let cx = m.from_signed(3) * s.var(x);
        // p = 3*x*y = coeff * x * Y
        let p = m.from_signed(3) * s.var(x) * s.var(y);
        assert_eq!(match_coeff_xy(&cx, &p), Some(s.var(y)));
        // coefficient 2 does not divide 3
        let q = m.from_signed(3) * s.var(x) * s.var(y);
        let cx2 = m.from_signed(2) * s.var(x);
        assert!(match_coeff_xy(&cx2, &q).is_none());
    }

    #[test]
    fn test_match_roundtrip_y_l_ax() {
        let (s, x, y, _) = state();
        let a = s.var2pdd(x).from_signed(5);
        let c = s.ule(&s.var(y), &(a.clone() * s.var(x)));
        let i = Inequality::from_ule(&c).unwrap();
        let (ma, my) = match_y_l_ax(x, &i).unwrap();
        assert!(verify_y_l_ax(&s, x, &i, &ma, &my));
        assert_eq!(ma, a);
    }

    #[test]
    fn test_match_roundtrip_ax_l_y() {
        let (s, x, y, _) = state();
        let a = s.var2pdd(x).from_signed(5);
        let c = s.ule(&(a.clone() * s.var(x)), &s.var(y));
        let i = Inequality::from_ule(&c).unwrap();
        let (ma, my) = match_ax_l_y(x, &i).unwrap();
        assert!(verify_ax_l_y(&s, x, &i, &ma, &my));
    }

    #[test]
    fn test_match_roundtrip_axb_l_y() {
        let (s, x, y, _) = state();
        let m = s.var2pdd(x);
        let lhs = m.from_signed(3) * s.var(x) + m.from_signed(7);
        let c = s.ule(&lhs, &s.var(y));
        let i = Inequality::from_ule(&c).unwrap();
        let (a, b, yy) = match_axb_l_y(x, &i).unwrap();
        assert!(verify_axb_l_y(&s, x, &i, &a, &b, &yy));
        assert_eq!(a, m.from_signed(3));
        assert_eq!(b, m.from_signed(7));
    }

    #[test]
    fn test_match_roundtrip_axb_eq_0() {
        let (mut s, x, _, _) = state();
        let m = s.var2pdd(x);
        let lhs = m.from_signed(3) * s.var(x) + m.from_signed(1);
        let c = s.ule(&lhs, &m.zero());
        let i = Inequality::from_ule(&c).unwrap();
        let (a, b, y) = match_axb_eq_0(&s, x, &i).unwrap();
        assert!(verify_axb_eq_0(&s, x, &i, &a, &b, &y));

        // a non-zero right-hand side is rejected
        let w = s.add_var(4);
        s.assign_value(w, BigUint::from(2u32)).unwrap();
        let c2 = s.ule(&lhs, &s.var(w));
        let i2 = Inequality::from_ule(&c2).unwrap();
        assert!(match_axb_eq_0(&s, x, &i2).is_none());
    }

    #[test]
    fn test_match_roundtrip_vx_l_zx() {
        let (s, x, y, z) = state();
        // [y] y*x <= z*x
        let c = s.ule(&(s.var(y) * s.var(x)), &(s.var(z) * s.var(x)));
        let i = Inequality::from_ule(&c).unwrap();
        let (mx, mz) = match_vx_l_zx(y, &i).unwrap();
        assert!(verify_vx_l_zx(&s, y, &i, &mx, &mz));
        assert_eq!(mx, s.var(x));
        assert_eq!(mz, s.var(z));
    }

    #[test]
    fn test_match_roundtrip_yx_l_vx() {
        let (s, x, y, z) = state();
        // [z] y*x <= z*x
        let c = s.ule(&(s.var(y) * s.var(x)), &(s.var(z) * s.var(x)));
        let i = Inequality::from_ule(&c).unwrap();
        let (mx, my) = match_yx_l_vx(z, &i).unwrap();
        assert!(verify_yx_l_vx(&s, z, &i, &mx, &my));
        assert_eq!(mx, s.var(x));
        assert_eq!(my, s.var(y));
    }

    #[test]
    fn test_match_x_l_y() {
        let (s, x, y, _) = state();
        let c = s.ule(&s.var(x), &s.var(y));
        let i = Inequality::from_ule(&c).unwrap();
        let my = match_x_l_y(&s, x, &i).unwrap();
        assert!(verify_x_l_y(&s, x, &i, &my));
        assert!(match_x_l_y(&s, y, &i).is_none());
    }
}
