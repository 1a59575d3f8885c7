//! The saturation rules.
//!
//! Each rule matches a shape of the incoming inequality in the target
//! variable, discharges its side conditions through the premise oracle,
//! and finalises a lemma through the engine. A rule yields false when
//! the shape does not match, a premise cannot be discharged, or the
//! finalisation finds the lemma redundant.

use crate::engine::Saturation;
use crate::inequality::Inequality;
use crate::matching::{
    is_g_v, is_l_v, match_axb_eq_0, match_vx_l_zx, match_xy_l_xz, match_y_l_ax, match_yx_l_vx,
    verify_vx_l_zx, verify_yx_l_vx, verify_y_l_ax,
};
use crate::premise::{
    ceil_bound, find_trail_ule, is_forced_diseq, is_forced_eq, is_non_overflow,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use polsat_core::{Conflict, LBool, PVar, Pdd, SignedConstraint, SolverState};

impl Saturation {
    /// Cancellation on the common factor x:
    ///
    /// ```text
    /// [x] yx < zx   ==>  ovfl*(x,y) \/ y < z
    /// [x] yx <= zx  ==>  ovfl*(x,y) \/ y <= z \/ x = 0
    /// ```
    pub fn try_ugt_x(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        xy_l_xz: &Inequality,
    ) -> bool {
        self.set_rule("[x] yx <= zx");
        let x = s.var(v);
        let Some((y, z)) = match_xy_l_xz(v, xy_l_xz) else {
            return false;
        };
        if !xy_l_xz.is_strict() && s.value(v).is_some_and(Zero::is_zero) {
            return false;
        }
        let Some(non_ovfl) = is_non_overflow(s, &x, &y) else {
            return false;
        };
        self.lemma.reset();
        self.lemma.insert_eval(!non_ovfl);
        if !xy_l_xz.is_strict() {
            self.lemma.insert_eval(s.eq(&x));
        }
        let conseq = self.ineq(s, xy_l_xz.is_strict(), &y, &z);
        self.add_conflict(s, core, xy_l_xz, conseq)
    }

    /// Monotonicity in the larger side, through a trail literal
    /// `z' <= y`:
    ///
    /// ```text
    /// [y] z' <= y /\ yx <= zx  ==>  ovfl*(x,y) \/ z'x <= zx
    /// ```
    ///
    /// The conclusion is strict when either premise is.
    pub fn try_ugt_y(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        yx_l_zx: &Inequality,
    ) -> bool {
        self.set_rule("[y] z' <= y & yx <= zx");
        let Some((x, z)) = match_vx_l_zx(v, yx_l_zx) else {
            return false;
        };
        find_trail_ule(s, |l_y| {
            is_l_v(s, v, l_y) && self.ugt_y_conclude(s, v, core, l_y, yx_l_zx, &x, &z)
        })
    }

    fn ugt_y_conclude(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        l_y: &Inequality,
        yx_l_zx: &Inequality,
        x: &Pdd,
        z: &Pdd,
    ) -> bool {
        debug_assert!(is_l_v(s, v, l_y));
        debug_assert!(verify_vx_l_zx(s, v, yx_l_zx, x, z));
        let y = s.var(v);
        let Some(non_ovfl) = is_non_overflow(s, x, &y) else {
            return false;
        };
        let z_prime = l_y.lhs();
        self.lemma.reset();
        self.lemma.insert_eval(!non_ovfl);
        let conseq = self.ineq(
            s,
            yx_l_zx.is_strict() || l_y.is_strict(),
            &(z_prime * x),
            &(z * x),
        );
        self.add_conflict2(s, core, l_y, yx_l_zx, conseq)
    }

    /// Monotonicity in the smaller side, through a trail literal
    /// `z <= y'`:
    ///
    /// ```text
    /// [z] z <= y' /\ yx <= zx  ==>  ovfl*(x,y') \/ yx <= y'x
    /// ```
    ///
    /// The conclusion is strict when either premise is.
    pub fn try_ugt_z(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        yx_l_zx: &Inequality,
    ) -> bool {
        self.set_rule("[z] z <= y' & yx <= zx");
        let Some((x, y)) = match_yx_l_vx(v, yx_l_zx) else {
            return false;
        };
        find_trail_ule(s, |z_l_y| {
            is_g_v(s, v, z_l_y) && self.ugt_z_conclude(s, v, core, z_l_y, yx_l_zx, &x, &y)
        })
    }

    fn ugt_z_conclude(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        z_l_y: &Inequality,
        yx_l_zx: &Inequality,
        x: &Pdd,
        y: &Pdd,
    ) -> bool {
        debug_assert!(is_g_v(s, v, z_l_y));
        debug_assert!(verify_yx_l_vx(s, v, yx_l_zx, x, y));
        let y_prime = z_l_y.rhs();
        let Some(non_ovfl) = is_non_overflow(s, x, y_prime) else {
            return false;
        };
        self.lemma.reset();
        self.lemma.insert_eval(!non_ovfl);
        let conseq = self.ineq(
            s,
            z_l_y.is_strict() || yx_l_zx.is_strict(),
            &(y * x),
            &(y_prime * x),
        );
        self.add_conflict2(s, core, yx_l_zx, z_l_y, conseq)
    }

    /// Chaining `y <= ax` with a trail literal `x <= z`:
    ///
    /// ```text
    /// [x] y <= ax /\ x <= z  ==>  ovfl*(a,z) \/ y <= az
    /// ```
    ///
    /// Skipped for `a = 1` (the conclusion would restate the premise).
    pub fn try_y_l_ax_and_x_l_z(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        y_l_ax: &Inequality,
    ) -> bool {
        self.set_rule("[x] y <= ax & x <= z");
        let Some((a, y)) = match_y_l_ax(v, y_l_ax) else {
            return false;
        };
        if a.is_one() {
            return false;
        }
        find_trail_ule(s, |x_l_z| {
            is_g_v(s, v, x_l_z) && self.chain_conclude(s, v, core, y_l_ax, x_l_z, &a, &y)
        })
    }

    fn chain_conclude(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        y_l_ax: &Inequality,
        x_l_z: &Inequality,
        a: &Pdd,
        y: &Pdd,
    ) -> bool {
        debug_assert!(is_g_v(s, v, x_l_z));
        debug_assert!(verify_y_l_ax(s, v, y_l_ax, a, y));
        let z = x_l_z.rhs();
        let Some(non_ovfl) = is_non_overflow(s, a, z) else {
            return false;
        };
        self.lemma.reset();
        self.lemma.insert_eval(!non_ovfl);
        let conseq = self.ineq(
            s,
            x_l_z.is_strict() || y_l_ax.is_strict(),
            y,
            &(a * z),
        );
        self.add_conflict2(s, core, y_l_ax, x_l_z, conseq)
    }

    /// Bounds from the equation `a*x = 0` with `a` and `x` forced
    /// non-zero:
    ///
    /// ```text
    /// [x] a*x + b = 0 & b = 0  ==>  a = 0 \/ x = 0 \/ ovfl*(s1*a, s2*x)
    /// ```
    ///
    /// for every sign combination; and when the trail bounds one factor
    /// by `u <= k`, the other factor `Y` satisfies `Y >= ceil(2^K / k)`
    /// in both signs. Cases with `k >= 2^(K-1)` get no special
    /// treatment.
    pub fn try_mul_bounds(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        axb_l_y: &Inequality,
    ) -> bool {
        self.set_rule("[x] a*x + b = 0 & b = 0 => a = 0 or x = 0 or ovfl(a, x)");
        let big_x = s.var(v);
        let m = s.var2pdd(v);
        let Some((a, b, y)) = match_axb_eq_0(s, v, axb_l_y) else {
            return false;
        };
        if a.is_val() {
            return false;
        }
        if !is_forced_eq(s, &b, 0) {
            return false;
        }
        let Some(x_eq_0) = is_forced_diseq(s, &big_x, 0) else {
            return false;
        };
        let Some(a_eq_0) = is_forced_diseq(s, &a, 0) else {
            return false;
        };

        let minus_a = -&a;
        let minus_x = -&big_x;
        let two_to_n = m.two_to_n();

        // Bound phase: a trail literal u <= k with u one of +-a, +-x
        // bounds the other factor from below.
        let fired = find_trail_ule(s, |u_l_k| {
            let Some(mut k_val) = u_l_k.rhs().as_val() else {
                return false;
            };
            if u_l_k.is_strict() {
                if k_val.is_zero() {
                    return false;
                }
                k_val -= 1u32;
            }
            if k_val <= BigUint::one() {
                return false;
            }
            let bounded = if *u_l_k.lhs() == a || *u_l_k.lhs() == minus_a {
                &big_x
            } else if *u_l_k.lhs() == big_x || *u_l_k.lhs() == minus_x {
                &a
            } else {
                return false;
            };
            let bound = ceil_bound(&two_to_n, &k_val);
            let ante = u_l_k.as_signed_constraint().clone();
            self.mul_bounds_seed(s, &b, &y, &x_eq_0, &a_eq_0);
            self.lemma.insert_eval(!&ante);
            if self.propagate(s, core, axb_l_y, s.uge(bounded, &bound)) {
                return true;
            }
            self.mul_bounds_seed(s, &b, &y, &x_eq_0, &a_eq_0);
            self.lemma.insert_eval(!&ante);
            self.propagate(s, core, axb_l_y, s.uge(&-bounded, &bound))
        });
        if fired {
            return true;
        }

        // Overflow phase: one of the four sign combinations overflows.
        for (p, q) in [
            (&a, &big_x),
            (&a, &minus_x),
            (&minus_a, &big_x),
            (&minus_a, &minus_x),
        ] {
            self.mul_bounds_seed(s, &b, &y, &x_eq_0, &a_eq_0);
            if self.propagate(s, core, axb_l_y, s.umul_ovfl(p, q)) {
                return true;
            }
        }
        false
    }

    fn mul_bounds_seed(
        &mut self,
        s: &SolverState,
        b: &Pdd,
        y: &Pdd,
        x_eq_0: &SignedConstraint,
        a_eq_0: &SignedConstraint,
    ) {
        self.lemma.reset();
        self.lemma.insert_eval(!s.eq(b));
        self.lemma.insert_eval(!s.eq(y));
        self.lemma.insert_eval(x_eq_0.clone());
        self.lemma.insert_eval(a_eq_0.clone());
    }

    /// Units from the equation `a*x = 1`:
    ///
    /// ```text
    /// a*x = 1 & ovfl*(a,x)  ==>  x = 1, and separately a = 1
    /// ```
    pub fn try_mul_eq_1(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        axb_l_y: &Inequality,
    ) -> bool {
        self.set_rule("[x] ax + b <= y & y = 0 & b = -1 & ~ovfl(a,x) => x = 1");
        let big_x = s.var(v);
        let Some((a, b, y)) = match_axb_eq_0(s, v, axb_l_y) else {
            return false;
        };
        if !is_forced_eq(s, &b, -1) {
            return false;
        }
        let Some(non_ovfl) = is_non_overflow(s, &a, &big_x) else {
            return false;
        };
        self.lemma.reset();
        self.lemma.insert_eval(!s.eq_val(&b, -1));
        self.lemma.insert_eval(!s.eq(&y));
        self.lemma.insert_eval(!non_ovfl);
        if self.propagate(s, core, axb_l_y, s.eq_val(&big_x, 1)) {
            return true;
        }
        if self.propagate(s, core, axb_l_y, s.eq_val(&a, 1)) {
            return true;
        }
        false
    }

    /// Parity propagation over the equation `a*x + b = 0`:
    ///
    /// ```text
    /// odd(a) & odd(x)           ==>  odd(b)
    /// odd(b)                    ==>  odd(a), odd(x)
    /// parity(a) + parity(x)     ==>  parity of b (capped at K)
    /// b lacks parity pb         ==>  a lacks parity pb, and per known
    ///                                parity i of one factor the other
    ///                                lacks parity pb - i
    /// ```
    pub fn try_parity(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        axb_l_y: &Inequality,
    ) -> bool {
        self.set_rule("[x] a*x + b = 0 => (odd(a) & odd(x) <=> odd(b))");
        let m = s.var2pdd(v);
        let n = m.power_of_2();
        let big_x = s.var(v);
        let Some((a, b, y)) = match_axb_eq_0(s, v, axb_l_y) else {
            return false;
        };
        // x == y and y == x propagate values in each direction already.
        if a.is_max() && b.is_var() {
            return false;
        }
        if a.is_one() && (-&b).is_var() {
            return false;
        }
        let b_is_odd = s.odd(&b);
        let a_is_odd = s.odd(&a);
        let x_is_odd = s.odd(&big_x);

        if a_is_odd.is_currently_true(s)
            && x_is_odd.is_currently_true(s)
            && self.parity_prop2(s, core, axb_l_y, &y, &a_is_odd, &x_is_odd, b_is_odd.clone())
        {
            return true;
        }

        if b_is_odd.is_currently_true(s) {
            if self.parity_prop1(s, core, axb_l_y, &y, &b_is_odd, a_is_odd.clone()) {
                return true;
            }
            if self.parity_prop1(s, core, axb_l_y, &y, &b_is_odd, x_is_odd.clone()) {
                return true;
            }
        }

        let mut a_parity: u32 = u32::from(a_is_odd.is_currently_false(s));
        let mut x_parity: u32 = u32::from(x_is_odd.is_currently_false(s));

        if (a_parity > 0 || x_parity > 0)
            && !is_forced_eq(s, &a, 0)
            && !is_forced_eq(s, &big_x, 0)
        {
            while a_parity < n && s.parity(&a, a_parity + 1).is_currently_true(s) {
                a_parity += 1;
            }
            while x_parity < n && s.parity(&big_x, x_parity + 1).is_currently_true(s) {
                x_parity += 1;
            }
            let b_parity = n.min(a_parity + x_parity);
            if a_parity > 0
                && x_parity > 0
                && self.parity_prop2(
                    s,
                    core,
                    axb_l_y,
                    &y,
                    &s.parity(&a, a_parity),
                    &s.parity(&big_x, x_parity),
                    s.parity(&b, b_parity),
                )
            {
                return true;
            }
            if a_parity > 0
                && x_parity == 0
                && self.parity_prop1(
                    s,
                    core,
                    axb_l_y,
                    &y,
                    &s.parity(&a, a_parity),
                    s.parity(&b, b_parity),
                )
            {
                return true;
            }
            if a_parity == 0
                && x_parity > 0
                && self.parity_prop1(
                    s,
                    core,
                    axb_l_y,
                    &y,
                    &s.parity(&big_x, x_parity),
                    s.parity(&b, b_parity),
                )
            {
                return true;
            }
        } else if !is_forced_eq(s, &b, 0) {
            // b caps the joint parity of a and x.
            let Some(b_parity) = (1..n).find(|&k| s.parity(&b, k).is_currently_false(s)) else {
                return false;
            };
            if self.parity_prop1(
                s,
                core,
                axb_l_y,
                &y,
                &!s.parity(&b, b_parity),
                !s.parity(&a, b_parity),
            ) {
                return true;
            }
            for i in 1..n {
                if i >= b_parity {
                    break;
                }
                if s.parity(&a, i).is_currently_true(s)
                    && self.parity_prop2(
                        s,
                        core,
                        axb_l_y,
                        &y,
                        &!s.parity(&b, b_parity),
                        &s.parity(&a, i),
                        !s.parity(&big_x, b_parity - i),
                    )
                {
                    return true;
                }
                if s.parity(&big_x, i).is_currently_true(s)
                    && self.parity_prop2(
                        s,
                        core,
                        axb_l_y,
                        &y,
                        &!s.parity(&b, b_parity),
                        &s.parity(&big_x, i),
                        !s.parity(&a, b_parity - i),
                    )
                {
                    return true;
                }
            }
        }
        false
    }

    fn parity_prop1(
        &mut self,
        s: &SolverState,
        core: &mut Conflict,
        crit: &Inequality,
        y: &Pdd,
        premise: &SignedConstraint,
        conseq: SignedConstraint,
    ) -> bool {
        self.lemma.reset();
        self.lemma.insert_eval(!s.eq(y));
        self.lemma.insert_eval(!premise);
        self.propagate(s, core, crit, conseq)
    }

    #[allow(clippy::too_many_arguments)]
    fn parity_prop2(
        &mut self,
        s: &SolverState,
        core: &mut Conflict,
        crit: &Inequality,
        y: &Pdd,
        premise1: &SignedConstraint,
        premise2: &SignedConstraint,
        conseq: SignedConstraint,
    ) -> bool {
        self.lemma.reset();
        self.lemma.insert_eval(!s.eq(y));
        self.lemma.insert_eval(!premise1);
        self.lemma.insert_eval(!premise2);
        self.propagate(s, core, crit, conseq)
    }

    /// Evenness from the equation `a*x = 0`:
    ///
    /// ```text
    /// a*x = 0  ==>  a = 0 \/ even(x)
    /// a*x = 0  ==>  a = 0 \/ x = 0 \/ even(a)
    /// ```
    pub fn try_mul_odd(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        axb_l_y: &Inequality,
    ) -> bool {
        self.set_rule("[x] ax = 0 => a = 0 or even(x)");
        let big_x = s.var(v);
        let Some((a, b, y)) = match_axb_eq_0(s, v, axb_l_y) else {
            return false;
        };
        if !is_forced_eq(s, &b, 0) {
            return false;
        }
        let Some(a_eq_0) = is_forced_diseq(s, &a, 0) else {
            return false;
        };
        self.lemma.reset();
        self.lemma.insert_eval(!s.eq(&y));
        self.lemma.insert_eval(!s.eq(&b));
        self.lemma.insert_eval(a_eq_0);
        if self.propagate(s, core, axb_l_y, s.even(&big_x)) {
            return true;
        }
        let Some(x_eq_0) = is_forced_diseq(s, &big_x, 0) else {
            return false;
        };
        self.lemma.insert_eval(x_eq_0);
        if self.propagate(s, core, axb_l_y, s.even(&a)) {
            return true;
        }
        false
    }

    /// Rewrite through a trail equality:
    ///
    /// ```text
    /// [x] abx + p <= q /\ ax + r = 0  ==>  -rb + p <= q
    /// ```
    ///
    /// and the dual with the sides swapped. Not implemented: always
    /// reports no match.
    pub fn try_factor_equality(
        &mut self,
        _s: &SolverState,
        _v: PVar,
        _core: &mut Conflict,
        _a_l_b: &Inequality,
    ) -> bool {
        self.set_rule("[x] ab*x + p <= q & a*x + r = 0");
        false
    }

    /// Tangent lemma for a non-linear inequality that evaluates false:
    ///
    /// ```text
    /// [x] p(x) <= q(x), value(p) > value(q)
    ///      ==>  q <= value(q) => p <= value(q)
    /// [x] p(x) < q(x), value(p) >= value(q)
    ///      ==>  value(p) <= p => value(p) < q
    /// ```
    pub fn try_tangent(
        &mut self,
        s: &SolverState,
        v: PVar,
        core: &mut Conflict,
        c: &Inequality,
    ) -> bool {
        self.set_rule("[x] p(x) <= q(x) where value(p) > value(q)");
        if !c.as_signed_constraint().contains_var(v) {
            return false;
        }
        if c.lhs().is_val() || c.rhs().is_val() {
            return false;
        }
        let mut is_linear = c.lhs().degree(v) <= 1 && c.rhs().degree(v) <= 1;
        if c.lhs().degree(v) == 1 {
            let (q_l, _) = c.lhs().factor(v, 1);
            is_linear &= q_l.is_val();
        }
        if c.rhs().degree(v) == 1 {
            let (q_r, _) = c.rhs().factor(v, 1);
            is_linear &= q_r.is_val();
        }
        if is_linear {
            return false;
        }
        if !c.as_signed_constraint().is_currently_false(s) {
            return false;
        }
        let Some(l_val) = s.try_eval(c.lhs()) else {
            return false;
        };
        let Some(r_val) = s.try_eval(c.rhs()) else {
            return false;
        };
        debug_assert!(c.is_strict() || l_val > r_val);
        debug_assert!(!c.is_strict() || l_val >= r_val);
        let m = c.lhs().manager();
        self.lemma.reset();
        if c.is_strict() {
            let d = s.ule(&m.constant(l_val), c.lhs());
            // A false side literal signals an unrelated value conflict
            // over v; the lemma would be redundant there.
            if d.bvalue(s) == LBool::False {
                return false;
            }
            self.lemma.insert_eval(!d);
            let conseq = s.ult(&m.constant(r_val), c.rhs());
            self.add_conflict(s, core, c, conseq)
        } else {
            let d = s.ule(c.rhs(), &m.constant(r_val.clone()));
            if d.bvalue(s) == LBool::False {
                return false;
            }
            self.lemma.insert_eval(!d);
            let conseq = s.ule(c.lhs(), &m.constant(r_val));
            self.add_conflict(s, core, c, conseq)
        }
    }
}
