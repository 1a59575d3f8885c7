//! Boolean valuation primitives for interned constraints.
//!
//! The saturation engine never handles raw SAT literals: a literal
//! here names an interned constraint atom together with the polarity
//! it was assigned with, and exists only so trail entries can be
//! mapped back to signed constraints through
//! [`SolverState::lit2cnstr`](crate::SolverState::lit2cnstr).

/// Index of an interned constraint atom.
pub type BVar = u32;

/// A trail literal: an interned constraint atom with a polarity.
///
/// The atom index and the polarity stay separate fields. Nothing in
/// the engine compares or packs literals as integers; a literal's only
/// job is to round-trip through the constraint interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    atom: BVar,
    positive: bool,
}

impl Lit {
    /// Literals are minted by the interner when a constraint is put on
    /// the trail.
    pub(crate) fn new(atom: BVar, positive: bool) -> Self {
        Self { atom, positive }
    }

    /// The interned atom this literal refers to.
    #[must_use]
    pub fn atom(self) -> BVar {
        self.atom
    }

    /// True if the literal asserts its atom positively.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.positive
    }
}

/// Three-valued boolean assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LBool {
    /// Assigned true.
    True,
    /// Assigned false.
    False,
    /// Not assigned.
    #[default]
    Undef,
}

impl LBool {
    /// Negate the assignment; `Undef` is a fixpoint.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            LBool::True => LBool::False,
            LBool::False => LBool::True,
            LBool::Undef => LBool::Undef,
        }
    }

    /// Lift a concrete boolean.
    #[must_use]
    pub fn from_bool(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}
