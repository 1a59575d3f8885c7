//! Signed theory constraints.
//!
//! Two atom kinds carry the whole constraint language: unsigned
//! less-or-equal between polynomials, and unsigned multiplication
//! overflow. Everything else (`eq`, `ult`, `uge`, `parity`, `odd`,
//! `even`) is sugar built from these by the factory methods on
//! [`crate::SolverState`].

use crate::literal::LBool;
use crate::state::SolverState;
use num_bigint::BigUint;
use num_traits::One;
use polsat_math::{Assignment, PVar, Pdd};
use std::fmt;
use std::ops::Not;

/// An unsigned constraint atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `lhs <= rhs`, unsigned, mod 2^K.
    Ule {
        /// Left-hand side polynomial.
        lhs: Pdd,
        /// Right-hand side polynomial.
        rhs: Pdd,
    },
    /// `p * q` overflows mod 2^K (the integer product is >= 2^K).
    UmulOvfl {
        /// First factor.
        p: Pdd,
        /// Second factor.
        q: Pdd,
    },
}

impl Constraint {
    /// Evaluate under a partial assignment; `None` when some variable is
    /// unassigned.
    #[must_use]
    pub fn eval(&self, assignment: &Assignment) -> Option<bool> {
        match self {
            Constraint::Ule { lhs, rhs } => {
                let l = lhs.try_eval(assignment)?;
                let r = rhs.try_eval(assignment)?;
                Some(l <= r)
            }
            Constraint::UmulOvfl { p, q } => {
                let pv = p.try_eval(assignment)?;
                let qv = q.try_eval(assignment)?;
                let bound = BigUint::one() << p.width();
                Some(pv * qv >= bound)
            }
        }
    }

    /// True if `var` occurs in this atom.
    #[must_use]
    pub fn contains_var(&self, var: PVar) -> bool {
        match self {
            Constraint::Ule { lhs, rhs } => lhs.contains_var(var) || rhs.contains_var(var),
            Constraint::UmulOvfl { p, q } => p.contains_var(var) || q.contains_var(var),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Ule { lhs, rhs } => write!(f, "{lhs} <= {rhs}"),
            Constraint::UmulOvfl { p, q } => write!(f, "ovfl*({p}, {q})"),
        }
    }
}

/// A constraint atom together with a polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedConstraint {
    cnstr: Constraint,
    positive: bool,
}

impl SignedConstraint {
    /// Wrap an atom with positive polarity.
    #[must_use]
    pub fn positive(cnstr: Constraint) -> Self {
        Self {
            cnstr,
            positive: true,
        }
    }

    /// Wrap an atom with negative polarity.
    #[must_use]
    pub fn negative(cnstr: Constraint) -> Self {
        Self {
            cnstr,
            positive: false,
        }
    }

    /// The underlying atom.
    #[inline]
    #[must_use]
    pub fn cnstr(&self) -> &Constraint {
        &self.cnstr
    }

    /// True if the polarity is positive.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// True if the polarity is negative.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.positive
    }

    /// The negated constraint.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            cnstr: self.cnstr.clone(),
            positive: !self.positive,
        }
    }

    /// True if the atom is a `<=` constraint.
    #[must_use]
    pub fn is_ule(&self) -> bool {
        matches!(self.cnstr, Constraint::Ule { .. })
    }

    /// The two sides of the atom, if it is a `<=` constraint.
    #[must_use]
    pub fn as_ule(&self) -> Option<(&Pdd, &Pdd)> {
        match &self.cnstr {
            Constraint::Ule { lhs, rhs } => Some((lhs, rhs)),
            Constraint::UmulOvfl { .. } => None,
        }
    }

    /// True if the atom is a multiplication-overflow constraint.
    #[must_use]
    pub fn is_umul_ovfl(&self) -> bool {
        matches!(self.cnstr, Constraint::UmulOvfl { .. })
    }

    /// The two factors, if the atom is a multiplication-overflow
    /// constraint.
    #[must_use]
    pub fn as_umul_ovfl(&self) -> Option<(&Pdd, &Pdd)> {
        match &self.cnstr {
            Constraint::UmulOvfl { p, q } => Some((p, q)),
            Constraint::Ule { .. } => None,
        }
    }

    /// True if `var` occurs in the atom.
    #[must_use]
    pub fn contains_var(&self, var: PVar) -> bool {
        self.cnstr.contains_var(var)
    }

    /// Evaluate under a partial assignment, polarity applied.
    #[must_use]
    pub fn eval(&self, assignment: &Assignment) -> Option<bool> {
        self.cnstr.eval(assignment).map(|b| b == self.positive)
    }

    /// Boolean trail valuation of this constraint.
    #[must_use]
    pub fn bvalue(&self, s: &SolverState) -> LBool {
        s.bvalue(self)
    }

    /// True if the constraint evaluates true under the current model.
    #[must_use]
    pub fn is_currently_true(&self, s: &SolverState) -> bool {
        self.eval(s.assignment()) == Some(true)
    }

    /// True if the constraint evaluates false under the current model.
    #[must_use]
    pub fn is_currently_false(&self, s: &SolverState) -> bool {
        self.eval(s.assignment()) == Some(false)
    }
}

impl Not for SignedConstraint {
    type Output = SignedConstraint;

    fn not(self) -> SignedConstraint {
        self.negate()
    }
}

impl Not for &SignedConstraint {
    type Output = SignedConstraint;

    fn not(self) -> SignedConstraint {
        self.negate()
    }
}

impl fmt::Display for SignedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.cnstr)
        } else {
            write!(f, "~({})", self.cnstr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polsat_math::PddManager;

    fn assign(pairs: &[(PVar, u32)]) -> Assignment {
        pairs
            .iter()
            .map(|&(v, x)| (v, BigUint::from(x)))
            .collect()
    }

    #[test]
    fn test_ule_eval() {
        let m = PddManager::new(4);
        let c = Constraint::Ule {
            lhs: m.var(0),
            rhs: m.var(1),
        };
        assert_eq!(c.eval(&assign(&[(0, 3), (1, 5)])), Some(true));
        assert_eq!(c.eval(&assign(&[(0, 6), (1, 5)])), Some(false));
        assert_eq!(c.eval(&assign(&[(0, 3)])), None);
    }

    #[test]
    fn test_ovfl_eval() {
        let m = PddManager::new(4);
        let c = Constraint::UmulOvfl {
            p: m.var(0),
            q: m.var(1),
        };
        // 3 * 5 = 15 < 16: no overflow
        assert_eq!(c.eval(&assign(&[(0, 3), (1, 5)])), Some(false));
        // 4 * 4 = 16: overflow
        assert_eq!(c.eval(&assign(&[(0, 4), (1, 4)])), Some(true));
    }

    #[test]
    fn test_polarity() {
        let m = PddManager::new(4);
        let c = SignedConstraint::positive(Constraint::Ule {
            lhs: m.var(0),
            rhs: m.zero(),
        });
        let a = assign(&[(0, 0)]);
        assert_eq!(c.eval(&a), Some(true));
        assert_eq!((!&c).eval(&a), Some(false));
        assert_eq!((!&c).negate(), c);
    }
}
