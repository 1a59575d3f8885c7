//! Inequality view over `<=` constraints.

use polsat_core::{Pdd, SignedConstraint};

/// An inequality `lhs <= rhs` or `lhs < rhs` extracted from a signed
/// `<=` constraint.
///
/// A negated `l <= r` is the strict inequality `r < l`, so the view
/// swaps the sides and sets the strictness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inequality {
    lhs: Pdd,
    rhs: Pdd,
    strict: bool,
    src: SignedConstraint,
}

impl Inequality {
    /// Build the view from a signed `<=` constraint; `None` for other
    /// atoms.
    #[must_use]
    pub fn from_ule(c: &SignedConstraint) -> Option<Self> {
        let (lhs, rhs) = c.as_ule()?;
        if c.is_positive() {
            Some(Self {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
                strict: false,
                src: c.clone(),
            })
        } else {
            Some(Self {
                lhs: rhs.clone(),
                rhs: lhs.clone(),
                strict: true,
                src: c.clone(),
            })
        }
    }

    /// The smaller side.
    #[inline]
    #[must_use]
    pub fn lhs(&self) -> &Pdd {
        &self.lhs
    }

    /// The larger side.
    #[inline]
    #[must_use]
    pub fn rhs(&self) -> &Pdd {
        &self.rhs
    }

    /// True for a strict inequality.
    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The source constraint this view was extracted from.
    #[inline]
    #[must_use]
    pub fn as_signed_constraint(&self) -> &SignedConstraint {
        &self.src
    }
}
